//! Candidate-facing feedback shown after an analysis.

/// Nominal ceiling printed next to the score.
pub const NOMINAL_MAX_SCORE: i32 = 15;

pub(crate) const SELECTED_FEEDBACK: &str = "\
🎉 **Congratulations! You've been selected for the {role} position!**

**Analysis Score: {score}/{max}**

**Strengths:**
✅ Strong technical background
✅ Relevant experience and skills
✅ Good educational foundation
✅ Professional presentation

**Next Steps:**
1. We'll schedule an interview within 24 hours
2. Prepare for a technical discussion
3. Bring examples of your work

**Interview Preparation Tips:**
- Review the job requirements
- Prepare to discuss your projects
- Have questions ready about the role
- Be ready for technical questions

We're excited to have you join our team!
";

pub(crate) const REJECTED_FEEDBACK: &str = "\
📝 **Thank you for your application for the {role} position**

**Analysis Score: {score}/{max}**

**Areas for Improvement:**
🔸 Consider adding more relevant technical skills
🔸 Include specific project examples
🔸 Highlight quantifiable achievements
🔸 Add certifications if applicable

**Suggestions:**
- Update your resume with recent projects
- Include a GitHub portfolio if available
- Add relevant certifications
- Emphasize technical skills

**Keep Learning:**
- Continue building projects
- Stay updated with industry trends
- Consider additional certifications
- Network with professionals in the field

We encourage you to apply again in the future!
";

pub(crate) fn render_feedback(is_selected: bool, role: &str, score: i32) -> String {
    let template = if is_selected {
        SELECTED_FEEDBACK
    } else {
        REJECTED_FEEDBACK
    };

    template
        .replace("{role}", role)
        .replace("{score}", &score.to_string())
        .replace("{max}", &NOMINAL_MAX_SCORE.to_string())
}
