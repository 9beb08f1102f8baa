use super::super::domain::{ScoreContribution, ScoreRule};

/// Keyword weights. Technical terms outrank generic ones; matching is by
/// substring, so "java" also fires on "javascript".
pub(crate) const KEYWORD_WEIGHTS: &[(&str, i32)] = &[
    ("python", 3),
    ("java", 2),
    ("javascript", 2),
    ("react", 2),
    ("node", 2),
    ("sql", 2),
    ("aws", 2),
    ("docker", 2),
    ("kubernetes", 2),
    ("machine learning", 3),
    ("ai", 2),
    ("data", 2),
    ("experience", 1),
    ("project", 1),
    ("education", 1),
    ("bachelor", 1),
    ("master", 2),
    ("phd", 3),
    ("certification", 1),
    ("github", 1),
    ("portfolio", 1),
];

/// Sections that earn a point on top of the keyword table, even when the
/// same word was already counted there.
pub(crate) const SECTION_MARKERS: &[&str] = &["experience", "education", "skills"];

pub(crate) const LENGTH_BONUS_THRESHOLD: usize = 500;
pub(crate) const LENGTH_BONUS: i32 = 2;
pub(crate) const SECTION_BONUS: i32 = 1;

pub(crate) struct BaseScore {
    pub total: i32,
    pub contributions: Vec<ScoreContribution>,
}

pub(crate) fn score_text(resume_text: &str) -> BaseScore {
    let lowered = resume_text.to_lowercase();
    let mut contributions = Vec::new();
    let mut total = 0;

    for (keyword, weight) in KEYWORD_WEIGHTS {
        if lowered.contains(keyword) {
            total += weight;
            contributions.push(ScoreContribution {
                rule: ScoreRule::Keyword,
                label: (*keyword).to_string(),
                points: *weight,
            });
        }
    }

    let length = resume_text.chars().count();
    if length > LENGTH_BONUS_THRESHOLD {
        total += LENGTH_BONUS;
        contributions.push(ScoreContribution {
            rule: ScoreRule::Length,
            label: format!("{length} characters"),
            points: LENGTH_BONUS,
        });
    }

    for marker in SECTION_MARKERS {
        if lowered.contains(marker) {
            total += SECTION_BONUS;
            contributions.push(ScoreContribution {
                rule: ScoreRule::Section,
                label: format!("{marker} section"),
                points: SECTION_BONUS,
            });
        }
    }

    BaseScore {
        total,
        contributions,
    }
}

/// Largest base score any text can reach.
pub(crate) fn max_base_score() -> i32 {
    let keywords: i32 = KEYWORD_WEIGHTS.iter().map(|(_, weight)| weight).sum();
    keywords + LENGTH_BONUS + SECTION_BONUS * SECTION_MARKERS.len() as i32
}
