use crate::domain::ports::{PrefEntries, PrefsBackend};
use crate::utils::error::{FixerError, Result};
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;

static MAP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<map(\s[^>]*)?/?>").expect("valid map pattern"));

static ENTRY_OPEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<entry\b").expect("valid entry open pattern"));

static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<entry\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("valid entry pattern")
});

static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute pattern")
});

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("valid entity pattern")
});

const XML_HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
    "<!DOCTYPE map SYSTEM \"http://java.sun.com/dtd/preferences.dtd\">\n",
);

/// A preferences node kept in Java's file-system `prefs.xml` format.
#[derive(Debug)]
pub struct XmlFilePrefs {
    path: PathBuf,
    backup: bool,
    backup_keep: usize,
    backed_up: AtomicBool,
}

pub const DEFAULT_BACKUP_KEEP: usize = 5;

impl XmlFilePrefs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup: false,
            backup_keep: DEFAULT_BACKUP_KEEP,
            backed_up: AtomicBool::new(false),
        }
    }

    /// Copy the existing file aside before the first write.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    /// Number of backups kept next to the file; older ones are removed.
    pub fn with_backup_keep(mut self, keep: usize) -> Self {
        self.backup_keep = keep.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn backup_existing(&self) -> Result<()> {
        if !self.backup || self.backed_up.load(Ordering::SeqCst) {
            return Ok(());
        }
        if tokio::fs::try_exists(&self.path).await? {
            let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S%3f");
            let backup_path = sibling(&self.path, &format!("{}.bak", stamp));
            tokio::fs::copy(&self.path, &backup_path).await?;
            tracing::info!("🗂️ Backed up preferences to {}", backup_path.display());
            self.prune_backups().await?;
        }
        self.backed_up.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Backup names sort by timestamp, so the oldest come first.
    async fn prune_backups(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = match self.path.file_name() {
            Some(name) => format!("{}.", name.to_string_lossy()),
            None => return Ok(()),
        };

        let mut backups = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix) && name.ends_with(".bak") {
                backups.push(entry.path());
            }
        }
        backups.sort();

        let excess = backups.len().saturating_sub(self.backup_keep);
        for old in backups.into_iter().take(excess) {
            tokio::fs::remove_file(&old).await?;
            tracing::debug!("Removed old backup {}", old.display());
        }
        Ok(())
    }
}

/// `prefs.xml` + `suffix` -> `prefs.xml.<suffix>` in the same directory.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "prefs.xml".into());
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[async_trait]
impl PrefsBackend for XmlFilePrefs {
    async fn load(&self) -> Result<PrefEntries> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => parse_prefs_xml(&content, &self.path.display().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "No preferences file at {}, treating node as empty",
                    self.path.display()
                );
                Ok(PrefEntries::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, entries: &PrefEntries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        self.backup_existing().await?;

        // 先寫暫存檔再 rename，避免寫到一半留下壞掉的檔案
        let tmp_path = sibling(&self.path, "tmp");
        tokio::fs::write(&tmp_path, render_prefs_xml(entries)).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn parse_prefs_xml(content: &str, origin: &str) -> Result<PrefEntries> {
    let mut entries = PrefEntries::new();
    if content.trim().is_empty() {
        return Ok(entries);
    }

    if !MAP_PATTERN.is_match(content) {
        return Err(FixerError::StoreFormatError {
            path: origin.to_string(),
            message: "missing <map> element".to_string(),
        });
    }

    let format_error = |message: String| FixerError::StoreFormatError {
        path: origin.to_string(),
        message,
    };

    // 任何無法解析的 entry 都視為錯誤，否則下次寫回時會遺失該設定
    let opened = ENTRY_OPEN_PATTERN.find_iter(content).count();
    let mut parsed = 0;
    for tag in ENTRY_PATTERN.captures_iter(content) {
        parsed += 1;
        let mut key = None;
        let mut value = None;
        for attr in ATTRIBUTE_PATTERN.captures_iter(&tag[1]) {
            let text = attr.get(2).or_else(|| attr.get(3)).map_or("", |m| m.as_str());
            match &attr[1] {
                "key" => key = Some(unescape(text)),
                "value" => value = Some(unescape(text)),
                _ => {}
            }
        }
        match (key, value) {
            (Some(key), Some(value)) => {
                entries.insert(key, value);
            }
            _ => {
                return Err(format_error(format!(
                    "entry without key or value: <entry{}>",
                    &tag[1]
                )))
            }
        }
    }

    if parsed != opened {
        return Err(format_error(format!(
            "{} of {} entries could not be read",
            opened - parsed,
            opened
        )));
    }
    Ok(entries)
}

pub fn render_prefs_xml(entries: &PrefEntries) -> String {
    let mut out = String::from(XML_HEADER);
    if entries.is_empty() {
        out.push_str("<map MAP_XML_VERSION=\"1.0\"/>\n");
        return out;
    }

    out.push_str("<map MAP_XML_VERSION=\"1.0\">\n");
    for (key, value) in entries {
        out.push_str(&format!(
            "  <entry key=\"{}\" value=\"{}\"/>\n",
            escape(key),
            escape(value)
        ));
    }
    out.push_str("</map>\n");
    out
}

fn unescape(text: &str) -> String {
    ENTITY_PATTERN
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = match entity.strip_prefix("#x") {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' | '\r' | '\t' => out.push_str(&format!("&#{};", c as u32)),
            _ => out.push(c),
        }
    }
    out
}
