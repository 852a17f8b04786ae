// SPDX-License-Identifier: MIT OR Apache-2.0

//! INI file configuration source adapter.
//!
//! This module provides an adapter that reads configuration values from INI-style
//! files. Keys of ordinary sections are flattened as `section.key`; keys of the
//! designated root sections are flattened without a prefix.

use crate::adapters::file::{default_config_path, read_canonical, read_config_file};
use crate::domain::{ConfigError, ConfigValue, Result};
use crate::ports::{ConfigParser, ConfigSource, Entry};
use std::path::{Path, PathBuf};

/// Name of the section whose options every other section inherits.
const DEFAULT_SECTION: &str = "DEFAULT";

/// INI parser implementation.
///
/// Supports `[section]` headers, `key = value` and `key: value` lines, full-line
/// comments starting with `#` or `;`, and blank lines. Option names are trimmed and
/// lowercased; section names keep their case. A line indented deeper than the option
/// it follows continues that option's value on a new line.
///
/// Options of the `[DEFAULT]` section are not stored on their own: every other
/// section inherits those it does not set itself, after its own options. A section
/// or option that appears twice is merged, the later value winning.
///
/// Values are kept as strings; typing them is the job of a validator.
///
/// # Examples
///
/// ```rust
/// use treecfg::adapters::IniParser;
/// use treecfg::domain::ConfigValue;
/// use treecfg::ports::ConfigParser;
///
/// let parser = IniParser::with_root_sections(["main"]);
/// let pairs = parser.parse("[main]\na = 1\n[db]\nhost = localhost\n").unwrap();
///
/// assert_eq!(pairs[0], ("a".to_string(), ConfigValue::from("1")));
/// assert_eq!(pairs[1], ("db.host".to_string(), ConfigValue::from("localhost")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IniParser {
    root_sections: Vec<String>,
}

impl IniParser {
    /// Creates a parser without root sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser whose `root_sections` are flattened without prefix.
    pub fn with_root_sections<I, S>(root_sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root_sections: root_sections.into_iter().map(Into::into).collect(),
        }
    }

    fn is_root(&self, section: &str) -> bool {
        self.root_sections.iter().any(|s| s == section)
    }
}

fn parse_error(line_no: usize, message: &str) -> ConfigError {
    ConfigError::ParseError {
        message: format!("Failed to parse INI at line {}: {}", line_no, message),
        source: None,
    }
}

/// Options of one section, in first-seen order. Values are kept as their lines.
#[derive(Debug, Default)]
struct Section {
    name: String,
    options: Vec<(String, Vec<String>)>,
}

impl Section {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    /// Sets `key` to a single-line value and returns the option's index.
    fn set(&mut self, key: String, value: &str) -> usize {
        let lines = vec![value.to_string()];
        match self.options.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                self.options[idx].1 = lines;
                idx
            }
            None => {
                self.options.push((key, lines));
                self.options.len() - 1
            }
        }
    }

    fn has(&self, key: &str) -> bool {
        self.options.iter().any(|(k, _)| k == key)
    }
}

#[derive(Debug, Clone, Copy)]
enum Target {
    Defaults,
    Section(usize),
}

fn target_mut<'a>(
    defaults: &'a mut Section,
    sections: &'a mut [Section],
    target: Target,
) -> &'a mut Section {
    match target {
        Target::Defaults => defaults,
        Target::Section(idx) => &mut sections[idx],
    }
}

fn join_lines(lines: &[String]) -> String {
    lines.join("\n").trim_end().to_string()
}

impl ConfigParser for IniParser {
    fn parse(&self, content: &str) -> Result<Vec<Entry>> {
        let mut defaults = Section::named(DEFAULT_SECTION);
        let mut sections: Vec<Section> = Vec::new();
        let mut target: Option<Target> = None;
        // The option a continuation line would extend, with its indentation.
        let mut open: Option<(usize, usize)> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let indent = raw.len() - raw.trim_start().len();

            if let (Some(t), Some((option, option_indent))) = (target, open) {
                let section = target_mut(&mut defaults, &mut sections, t);
                if line.is_empty() {
                    // Kept only if a continuation follows; trailing blanks are trimmed.
                    section.options[option].1.push(String::new());
                    continue;
                }
                if indent > option_indent {
                    section.options[option].1.push(line.to_string());
                    continue;
                }
            }
            if line.is_empty() {
                continue;
            }
            open = None;

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| parse_error(line_no, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(parse_error(line_no, "empty section name"));
                }
                target = Some(if name == DEFAULT_SECTION {
                    Target::Defaults
                } else {
                    match sections.iter().position(|s| s.name == name) {
                        Some(existing) => Target::Section(existing),
                        None => {
                            sections.push(Section::named(name));
                            Target::Section(sections.len() - 1)
                        }
                    }
                });
                continue;
            }

            let split = line
                .find(|c: char| c == '=' || c == ':')
                .ok_or_else(|| parse_error(line_no, "expected 'key = value'"))?;
            let key = line[..split].trim().to_lowercase();
            let value = line[split + 1..].trim();
            if key.is_empty() {
                return Err(parse_error(line_no, "empty key"));
            }

            let t = target.ok_or_else(|| parse_error(line_no, "key outside of any section"))?;
            let option = target_mut(&mut defaults, &mut sections, t).set(key, value);
            open = Some((option, indent));
        }

        let mut entries = Vec::new();
        for section in &sections {
            let inherited = defaults.options.iter().filter(|(k, _)| !section.has(k));
            for (key, lines) in section.options.iter().chain(inherited) {
                let full_key = if self.is_root(&section.name) {
                    key.clone()
                } else {
                    format!("{}.{}", section.name, key)
                };
                entries.push((full_key, ConfigValue::from(join_lines(lines))));
            }
        }

        Ok(entries)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["ini", "cfg", "conf"]
    }
}

/// Configuration source adapter for INI files.
///
/// # Priority
///
/// INI files have a priority of 1, which means they are overridden by both
/// environment variables (priority 2) and command-line arguments (priority 3).
///
/// # Examples
///
/// ```rust,no_run
/// use treecfg::adapters::IniFileAdapter;
///
/// // Keys of [main] are stored without prefix.
/// let adapter = IniFileAdapter::from_file("/etc/myapp/config.ini", ["main"]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct IniFileAdapter {
    /// Path to the INI file
    file_path: PathBuf,
    /// Parsed pairs, in file order
    entries: Vec<Entry>,
    /// INI parser
    parser: IniParser,
}

impl IniFileAdapter {
    /// Creates a new INI file adapter from a specific file path.
    ///
    /// Keys of `root_sections` are flattened without their section prefix.
    pub fn from_file<P, I, S>(path: P, root_sections: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parser = IniParser::with_root_sections(root_sections);
        let (file_path, content) = read_config_file("ini-file", path.as_ref())?;
        let entries = parser.parse(&content)?;

        Ok(Self {
            file_path,
            entries,
            parser,
        })
    }

    /// Creates a new INI file adapter from `config.ini` in the default OS-appropriate
    /// location.
    pub fn from_default_location<I, S>(
        app_name: &str,
        qualifier: &str,
        root_sections: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = default_config_path("ini-file", app_name, qualifier, "config.ini")?;
        Self::from_file(path, root_sections)
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl ConfigSource for IniFileAdapter {
    fn name(&self) -> &str {
        "ini-file"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn entries(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.clone())
    }

    fn reload(&mut self) -> Result<()> {
        let content = read_canonical("ini-file", &self.file_path)?;
        self.entries = self.parser.parse(&content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "
[main]
a = 1
b = 2

[subsect_a]
c = 3
d: 4

; comment
[extensions.importer.foo]
g = 6

[extensions.downloader.zar]
k = 10
foo.bar = x
";

    fn keys(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_parse_with_root_section() {
        let entries = IniParser::with_root_sections(["main"]).parse(SAMPLE).unwrap();
        assert_eq!(
            keys(&entries),
            vec![
                "a",
                "b",
                "subsect_a.c",
                "subsect_a.d",
                "extensions.importer.foo.g",
                "extensions.downloader.zar.k",
                "extensions.downloader.zar.foo.bar",
            ]
        );
        assert_eq!(entries[3].1, ConfigValue::from("4"));
        assert_eq!(entries[6].1, ConfigValue::from("x"));
    }

    #[test]
    fn test_parse_without_root_section() {
        let entries = IniParser::new().parse(SAMPLE).unwrap();
        assert_eq!(entries[0].0, "main.a");
    }

    #[test]
    fn test_value_may_contain_delimiters() {
        let entries = IniParser::new()
            .parse("[db]\nurl = postgres://h:5432/x?a=b\n")
            .unwrap();
        assert_eq!(entries[0].1, ConfigValue::from("postgres://h:5432/x?a=b"));
    }

    #[test]
    fn test_empty_value() {
        let entries = IniParser::new().parse("[s]\nkey =\n").unwrap();
        assert_eq!(entries[0].1, ConfigValue::from(""));
    }

    #[test]
    fn test_option_names_are_lowercased() {
        let entries = IniParser::with_root_sections(["main"])
            .parse("[main]\nName = x\n[Server]\nHOST = h\n")
            .unwrap();
        assert_eq!(keys(&entries), vec!["name", "Server.host"]);
    }

    #[test]
    fn test_continuation_lines() {
        let entries = IniParser::with_root_sections(["main"])
            .parse("[main]\nName = x\n[s]\nkey = first\n  continued\n\n    last\n\nnext = 2\n")
            .unwrap();
        assert_eq!(
            entries,
            vec![
                ("name".to_string(), ConfigValue::from("x")),
                ("s.key".to_string(), ConfigValue::from("first\ncontinued\n\nlast")),
                ("s.next".to_string(), ConfigValue::from("2")),
            ]
        );
    }

    #[test]
    fn test_indented_option_needs_deeper_continuation() {
        let entries = IniParser::new()
            .parse("[s]\n  a = 1\n  b = 2\n    more\n")
            .unwrap();
        assert_eq!(
            entries,
            vec![
                ("s.a".to_string(), ConfigValue::from("1")),
                ("s.b".to_string(), ConfigValue::from("2\nmore")),
            ]
        );
    }

    #[test]
    fn test_default_section_is_inherited() {
        let content = "[DEFAULT]\nlevel = info\ncolor = no\n\n[main]\nname = x\n\n[log]\nlevel = debug\n";
        let entries = IniParser::with_root_sections(["main"]).parse(content).unwrap();
        assert_eq!(
            entries,
            vec![
                ("name".to_string(), ConfigValue::from("x")),
                ("level".to_string(), ConfigValue::from("info")),
                ("color".to_string(), ConfigValue::from("no")),
                ("log.level".to_string(), ConfigValue::from("debug")),
                ("log.color".to_string(), ConfigValue::from("no")),
            ]
        );
    }

    #[test]
    fn test_default_section_alone_yields_nothing() {
        let entries = IniParser::new().parse("[DEFAULT]\na = 1\n").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_repeated_section_and_option_merge() {
        let entries = IniParser::new()
            .parse("[s]\na = 1\nb = 2\n[t]\nc = 3\n[s]\na = 4\n")
            .unwrap();
        assert_eq!(
            entries,
            vec![
                ("s.a".to_string(), ConfigValue::from("4")),
                ("s.b".to_string(), ConfigValue::from("2")),
                ("t.c".to_string(), ConfigValue::from("3")),
            ]
        );
    }

    #[test]
    fn test_parse_errors() {
        let parser = IniParser::new();
        for content in [
            "a = 1",
            "[unterminated\na = 1",
            "[]\na = 1",
            "[s]\njust text",
            "[s]\n= value",
        ] {
            assert!(
                matches!(parser.parse(content), Err(ConfigError::ParseError { .. })),
                "accepted {:?}",
                content
            );
        }
    }

    #[test]
    fn test_adapter_from_file_and_reload() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[main]\nname = first").unwrap();
        file.flush().unwrap();

        let mut adapter = IniFileAdapter::from_file(file.path(), ["main"]).unwrap();
        assert_eq!(adapter.name(), "ini-file");
        assert_eq!(adapter.priority(), 1);
        assert_eq!(
            adapter.entries().unwrap(),
            vec![("name".to_string(), ConfigValue::from("first"))]
        );

        let mut handle = std::fs::File::create(file.path()).unwrap();
        writeln!(handle, "[main]\nname = second").unwrap();
        handle.flush().unwrap();

        adapter.reload().unwrap();
        assert_eq!(
            adapter.entries().unwrap(),
            vec![("name".to_string(), ConfigValue::from("second"))]
        );
    }

    #[test]
    fn test_adapter_missing_file() {
        let result = IniFileAdapter::from_file("/nonexistent/config.ini", Vec::<String>::new());
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }
}
