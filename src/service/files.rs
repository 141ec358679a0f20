use crate::service::error::ServiceError;

/// Role an uploaded file plays in an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileField {
    Resume,
    Portfolio,
    CoverLetter,
}

impl FileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileField::Resume => "resume",
            FileField::Portfolio => "portfolio",
            FileField::CoverLetter => "cover_letter",
        }
    }

    pub fn parse(name: &str) -> Option<FileField> {
        match name {
            "resume" => Some(FileField::Resume),
            "portfolio" => Some(FileField::Portfolio),
            "cover_letter" => Some(FileField::CoverLetter),
            _ => None,
        }
    }
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.rsplit('.')
        .next()
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
        && name.contains('.')
}

/// Two-signal file-type check: the declared MIME type OR the filename
/// extension is sufficient. Intentionally permissive — the upload is only
/// ever served back to the company owner.
pub fn validate_upload(
    field: FileField,
    original_name: &str,
    mime: Option<&str>,
) -> Result<(), ServiceError> {
    let mime = mime.unwrap_or("");
    let ok = match field {
        FileField::Resume | FileField::CoverLetter => {
            mime == "application/pdf"
                || mime == "image/png"
                || has_extension(original_name, "pdf")
                || has_extension(original_name, "png")
        }
        FileField::Portfolio => mime == "image/png" || has_extension(original_name, "png"),
    };

    if ok {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!(
            "Invalid file type for {}: {}",
            field.as_str(),
            original_name
        )))
    }
}

/// Content type for serving a stored file, from stored MIME first and the
/// filename extension as fallback.
pub fn content_type_for(original_name: &str, mime: Option<&str>) -> String {
    if let Some(m) = mime {
        if !m.is_empty() {
            return m.to_string();
        }
    }
    if has_extension(original_name, "pdf") {
        "application/pdf".to_string()
    } else if has_extension(original_name, "png") {
        "image/png".to_string()
    } else if has_extension(original_name, "jpg") || has_extension(original_name, "jpeg") {
        "image/jpeg".to_string()
    } else {
        "application/octet-stream".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resume_accepts_pdf_by_mime() {
        assert!(validate_upload(FileField::Resume, "anything.bin", Some("application/pdf")).is_ok());
    }

    #[test]
    fn resume_accepts_png_by_extension_alone() {
        // either signal is sufficient
        assert!(validate_upload(FileField::Resume, "scan.PNG", Some("application/octet-stream")).is_ok());
        assert!(validate_upload(FileField::Resume, "cv.pdf", None).is_ok());
    }

    #[test]
    fn resume_rejects_executable() {
        assert!(validate_upload(FileField::Resume, "resume.exe", Some("application/x-msdownload")).is_err());
        assert!(validate_upload(FileField::Resume, "resume", None).is_err());
    }

    #[test]
    fn portfolio_is_png_only() {
        assert!(validate_upload(FileField::Portfolio, "work.png", None).is_ok());
        assert!(validate_upload(FileField::Portfolio, "work.pdf", Some("application/pdf")).is_err());
    }

    #[test]
    fn cover_letter_matches_resume_rules() {
        assert!(validate_upload(FileField::CoverLetter, "letter.pdf", None).is_ok());
        assert!(validate_upload(FileField::CoverLetter, "letter.docx", None).is_err());
    }

    #[test]
    fn field_round_trip() {
        for f in [FileField::Resume, FileField::Portfolio, FileField::CoverLetter] {
            assert_eq!(FileField::parse(f.as_str()), Some(f));
        }
        assert_eq!(FileField::parse("avatar"), None);
    }

    #[test]
    fn content_type_fallback_chain() {
        assert_eq!(content_type_for("a.pdf", None), "application/pdf");
        assert_eq!(content_type_for("a.png", Some("")), "image/png");
        assert_eq!(content_type_for("a.bin", None), "application/octet-stream");
        assert_eq!(content_type_for("a.bin", Some("image/png")), "image/png");
    }
}
