use crate::infra::catalog_facade;
use clap::Args;
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::workflows::screening::extraction::extract_resume_text;
use hireflow::workflows::screening::{
    AnalysisResult, ExtractionError, PdfTextExtractor, ScoreRule, ScoringEngine,
};
use mime_guess::mime;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Resume to score: a PDF, or a plain-text rendition of one
    #[arg(long)]
    pub(crate) resume: PathBuf,
    /// Catalog role to score against
    #[arg(long)]
    pub(crate) role: String,
    /// Job catalog file (defaults to JOB_CATALOG_PATH)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) fn run_analysis(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = catalog_facade(&config, args.catalog)?;
    let requirement = catalog.get_requirement(args.role.trim())?;

    let text = read_resume(&args.resume)?;
    let result = ScoringEngine::default().analyze(&text, &requirement, &requirement.role);
    render_analysis(&requirement.role, &args.resume, &result);
    Ok(())
}

fn read_resume(path: &Path) -> Result<String, AppError> {
    let guess = mime_guess::from_path(path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resume");

    if guess == mime::APPLICATION_PDF {
        let bytes = fs::read(path)?;
        return Ok(extract_resume_text(&PdfTextExtractor, file_name, &bytes)?);
    }
    if guess.type_() == mime::TEXT {
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Err(ExtractionError::NoText.into());
        }
        return Ok(text);
    }

    Err(ExtractionError::UnsupportedFormat(guess.essence_str().to_string()).into())
}

fn render_analysis(role: &str, path: &Path, result: &AnalysisResult) {
    let decision = if result.is_selected {
        "selected"
    } else {
        "rejected"
    };
    println!("Resume analysis for {role}");
    println!("  file: {}", path.display());
    println!("  score: {} ({decision})", result.score);

    println!("\nScore breakdown");
    for entry in &result.breakdown {
        let kind = match entry.rule {
            ScoreRule::Keyword => "keyword",
            ScoreRule::Length => "length",
            ScoreRule::Section => "section",
            ScoreRule::Adjustment => "adjustment",
        };
        println!("  {:>+3}  {kind:<10} {}", entry.points, entry.label);
    }

    println!("\n{}", result.feedback);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("scratch file");
        path
    }

    #[test]
    fn plain_text_resume_is_read_verbatim() {
        let dir = TempDir::new().expect("temp dir");
        let path = scratch(&dir, "plain.txt", b"Python and SQL experience");
        assert_eq!(
            read_resume(&path).expect("text read"),
            "Python and SQL experience"
        );
    }

    #[test]
    fn blank_text_resume_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = scratch(&dir, "blank.txt", b"  \n");
        assert!(matches!(
            read_resume(&path),
            Err(AppError::Extraction(ExtractionError::NoText))
        ));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = scratch(&dir, "resume.docx", b"PK\x03\x04");
        assert!(matches!(
            read_resume(&path),
            Err(AppError::Extraction(ExtractionError::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn unreadable_pdf_is_an_extraction_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = scratch(&dir, "resume.pdf", b"%PDF-1.4\nnot a document");
        assert!(matches!(
            read_resume(&path),
            Err(AppError::Extraction(ExtractionError::Backend(_)))
        ));
    }
}
