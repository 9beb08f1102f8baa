use serde::Serialize;

/// Rendered candidate email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}

struct EmailTemplate {
    subject: &'static str,
    body: &'static str,
}

const SELECTION_EMAIL: EmailTemplate = EmailTemplate {
    subject: "Congratulations! You've been selected for {role} position",
    body: "\
Dear Candidate,

We are pleased to inform you that you have been selected for the {role} position at {company_name}!

Your application stood out among many qualified candidates, and we are excited about the possibility of you joining our team.

Next Steps:
- We will contact you within 24 hours to schedule an interview
- Please prepare for a technical discussion
- Bring examples of your work and projects
- Have questions ready about the role and company

Interview Details:
- Format: Technical interview via Zoom
- Duration: Approximately 45-60 minutes
- Topics: Technical skills, project discussion, role-specific questions

We look forward to meeting you!

Best regards,
The Recruiting Team
{company_name}
",
};

const REJECTION_EMAIL: EmailTemplate = EmailTemplate {
    subject: "Application Update - {role} Position",
    body: "\
Dear Candidate,

Thank you for your interest in the {role} position at {company_name}.

After careful review of your application, we regret to inform you that we have decided to move forward with other candidates whose qualifications more closely match our current needs.

Feedback:
- Your application was reviewed thoroughly
- We appreciate the time you invested in applying
- We encourage you to apply for future opportunities

Suggestions for Future Applications:
- Continue developing relevant technical skills
- Include specific project examples in your resume
- Consider obtaining relevant certifications
- Stay updated with industry trends

We wish you the best in your job search and future endeavors.

Best regards,
The Recruiting Team
{company_name}
",
};

/// Renders the selection or rejection email. The recipient is not part of the
/// text; it is accepted so transports and templates share one call shape.
pub fn generate_email(
    is_selected: bool,
    _candidate_email: &str,
    company_name: &str,
    role: &str,
) -> EmailContent {
    let template = if is_selected {
        &SELECTION_EMAIL
    } else {
        &REJECTION_EMAIL
    };

    EmailContent {
        subject: fill(template.subject, role, company_name),
        body: fill(template.body, role, company_name),
    }
}

fn fill(template: &str, role: &str, company_name: &str) -> String {
    template
        .replace("{role}", role)
        .replace("{company_name}", company_name)
}
