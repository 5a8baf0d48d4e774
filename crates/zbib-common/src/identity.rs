use serde::{Deserialize, Serialize};

/// Who the applicant is, as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantIdentity {
    #[serde(default)]
    pub name_cn: String,
    pub name_en: String,
    #[serde(default)]
    pub affiliations: Vec<String>,
    /// Name variants as they appear in author lists (e.g. "Hu Q", "Q. Hu").
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ApplicantIdentity {
    pub fn new(name_en: impl Into<String>) -> Self {
        Self { name_en: name_en.into(), ..Default::default() }
    }

    pub fn with_name_cn(mut self, name_cn: impl Into<String>) -> Self {
        self.name_cn = name_cn.into();
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Every spelling that identifies the applicant, blanks removed.
    pub fn known_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name_en.as_str())
            .chain(std::iter::once(self.name_cn.as_str()))
            .chain(self.aliases.iter().map(String::as_str))
            .filter(|n| !n.trim().is_empty())
    }

    pub fn display_name(&self) -> &str {
        if self.name_cn.trim().is_empty() { &self.name_en } else { &self.name_cn }
    }
}

/// Case-insensitive, whitespace-collapsed form used for every exact name
/// comparison. No other normalisation is applied.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Hu   QIANG "), "hu qiang");
        assert_ne!(normalize_name("Q. Hu"), normalize_name("Q Hu"));
    }

    #[test]
    fn test_known_names_skips_blank() {
        let id = ApplicantIdentity::new("Qiang Hu").with_alias("Hu Q").with_alias("  ");
        let names: Vec<&str> = id.known_names().collect();
        assert_eq!(names, vec!["Qiang Hu", "Hu Q"]);
        assert_eq!(id.display_name(), "Qiang Hu");
    }
}
