use crate::error::{Result, SetupError};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::Path;

/// An env file held as its original lines, so untouched lines are written
/// back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvFile {
    // Split on '\n' only: a trailing '\r' stays part of its line and a final
    // newline shows up as an empty last element.
    lines: Vec<String>,
}

impl EnvFile {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SetupError::EnvFile {
            action: "read",
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|source| SetupError::EnvFile {
            action: "write",
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the first line starting with `KEY=` by `KEY=value`.
    /// Returns false (and changes nothing) when no line matches.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let Some(re) = key_pattern(key) else {
            return false;
        };
        let replacement = format!("{key}={value}");

        for line in self.lines.iter_mut() {
            if re.is_match(line) {
                let replaced = re.replace(line.as_str(), NoExpand(&replacement)).into_owned();
                *line = replaced;
                return true;
            }
        }
        false
    }

    /// Key/value pairs as a dotenv parser sees them. Lines it cannot parse
    /// are skipped.
    pub fn entries(&self) -> Vec<(String, String)> {
        let rendered = self.render();
        dotenvy::from_read_iter(rendered.as_bytes())
            .filter_map(|item| item.ok())
            .collect()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

fn key_pattern(key: &str) -> Option<Regex> {
    // The value runs to the end of the line but never swallows a CRLF '\r'.
    Regex::new(&format!(r"^{}=[^\r]*", regex::escape(key))).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "# SupaLLM\nSECRET_KEY=\nFRONTEND_PORT=3000\nBACKEND_PORT=3001\n";

    #[test]
    fn set_replaces_only_the_matching_line() {
        let mut env = EnvFile::parse(TEMPLATE);
        assert!(env.set("FRONTEND_PORT", "4000"));
        assert_eq!(
            env.render(),
            "# SupaLLM\nSECRET_KEY=\nFRONTEND_PORT=4000\nBACKEND_PORT=3001\n"
        );
    }

    #[test]
    fn missing_key_leaves_content_identical() {
        let mut env = EnvFile::parse(TEMPLATE);
        assert!(!env.set("SUPALLM_API_URL", "http://localhost:4001"));
        assert_eq!(env.render(), TEMPLATE);
    }

    #[test]
    fn match_is_anchored_to_line_start() {
        let mut env = EnvFile::parse("NEXT_PUBLIC_SECRET_KEY=a\nSECRET_KEY=b\n");
        assert!(env.set("SECRET_KEY", "c"));
        assert_eq!(env.render(), "NEXT_PUBLIC_SECRET_KEY=a\nSECRET_KEY=c\n");
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let mut env = EnvFile::parse("FRONTEND_PORT=1\nFRONTEND_PORT=2");
        assert!(env.set("FRONTEND_PORT", "3"));
        assert_eq!(env.render(), "FRONTEND_PORT=3\nFRONTEND_PORT=2");
    }

    #[test]
    fn crlf_line_endings_survive() {
        let mut env = EnvFile::parse("A=1\r\nSECRET_KEY=old\r\nB=2\r\n");
        assert!(env.set("SECRET_KEY", "new"));
        assert_eq!(env.render(), "A=1\r\nSECRET_KEY=new\r\nB=2\r\n");
    }

    #[test]
    fn dollar_signs_in_values_are_literal() {
        let mut env = EnvFile::parse("INITIAL_USER_PASSWORD=\n");
        assert!(env.set("INITIAL_USER_PASSWORD", "pa$1word$$"));
        assert_eq!(env.render(), "INITIAL_USER_PASSWORD=pa$1word$$\n");
    }

    #[test]
    fn key_is_matched_literally() {
        let mut env = EnvFile::parse("AXB=1\n");
        assert!(!env.set("A.B", "2"));
        assert_eq!(env.render(), "AXB=1\n");
    }

    #[test]
    fn entries_reflect_replaced_values() {
        let mut env = EnvFile::parse(TEMPLATE);
        env.set("BACKEND_PORT", "4001");
        assert_eq!(env.get("BACKEND_PORT").as_deref(), Some("4001"));
        assert_eq!(env.get("FRONTEND_PORT").as_deref(), Some("3000"));
        assert_eq!(env.get("MISSING"), None);
    }

    #[test]
    fn load_and_save_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, TEMPLATE).unwrap();

        let mut env = EnvFile::load(&path).unwrap();
        env.set("SECRET_KEY", "abc");
        env.save(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# SupaLLM\nSECRET_KEY=abc\nFRONTEND_PORT=3000\nBACKEND_PORT=3001\n"
        );
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = EnvFile::load(&dir.path().join(".env")).unwrap_err();
        assert!(matches!(err, SetupError::EnvFile { action: "read", .. }));
    }
}
