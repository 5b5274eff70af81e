//! Uploads registry
//!
//! Builds the tech and project collections from an uploads directory laid out
//! as `tech/<id>/...` and `projects/<id>/...`, and exports them as the static
//! data files the site reads.

use crate::resource::{Project, ResourceKind, TechShowcase};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DEFAULT_TECH_DESCRIPTION: &str = "No description available.";
const DEFAULT_PROJECT_DESCRIPTION: &str = "Project description placeholder.";

/// Title/description replacements for one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOverride {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Overrides keyed by record id, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    by_id: HashMap<String, RecordOverride>,
}

impl Overrides {
    pub fn new(entries: &BTreeMap<String, RecordOverride>) -> Self {
        Self {
            by_id: entries
                .iter()
                .map(|(id, o)| (id.to_lowercase(), o.clone()))
                .collect(),
        }
    }

    fn get(&self, id: &str) -> Option<&RecordOverride> {
        self.by_id.get(&id.to_lowercase())
    }

    fn title(&self, id: &str) -> String {
        self.get(id)
            .and_then(|o| o.title.clone())
            .unwrap_or_else(|| id.to_string())
    }

    fn description(&self, id: &str, default: &str) -> String {
        self.get(id)
            .and_then(|o| o.description.clone())
            .unwrap_or_else(|| default.to_string())
    }
}

/// Registry rooted at an uploads directory
#[derive(Debug, Clone)]
pub struct Registry {
    root: PathBuf,
    overrides: Overrides,
}

impl Registry {
    pub fn new(root: impl Into<PathBuf>, overrides: Overrides) -> Self {
        Self {
            root: root.into(),
            overrides,
        }
    }

    pub fn tech_dir(&self) -> PathBuf {
        self.root.join("tech")
    }

    pub fn project_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    /// One entry per subdirectory of `tech/`, with every source file inlined
    pub fn scan_techs(&self) -> Result<Vec<TechShowcase>> {
        let mut techs = Vec::new();

        for dir in subdirectories(&self.tech_dir())? {
            let id = dir_name(&dir);
            let files = read_tech_files(&dir);
            let language = detect_language(files.keys().map(String::as_str)).to_string();

            techs.push(TechShowcase {
                title: self.overrides.title(&id),
                description: self.overrides.description(&id, DEFAULT_TECH_DESCRIPTION),
                id,
                language,
                files,
            });
        }

        tracing::info!("Scanned {} tech entries from {}", techs.len(), self.root.display());
        Ok(techs)
    }

    /// One project per subdirectory of `projects/`, files mapped to download URLs
    pub fn scan_projects(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();

        for dir in subdirectories(&self.project_dir())? {
            let id = dir_name(&dir);
            let mut project = Project {
                title: self.overrides.title(&id),
                description: self.overrides.description(&id, DEFAULT_PROJECT_DESCRIPTION),
                id,
                logo: None,
                cover: None,
                pdf: None,
                files: BTreeMap::new(),
            };

            let entries = fs::read_dir(&dir)
                .with_context(|| format!("Failed to list {}", dir.display()))?;
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();

            for name in names {
                let url = project_file_url(&project.id, &name);
                match classify_project_file(&name) {
                    Some(AssetRole::Pdf) => project.pdf = Some(url.clone()),
                    Some(AssetRole::Logo) => project.logo = Some(url.clone()),
                    Some(AssetRole::Cover) => project.cover = Some(url.clone()),
                    None => {}
                }
                project.files.insert(name, url);
            }

            projects.push(project);
        }

        tracing::info!("Scanned {} projects from {}", projects.len(), self.root.display());
        Ok(projects)
    }

    /// Write `data/tech.json` and `data/project.json` under `out_dir`
    pub fn export(&self, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let techs = self.scan_techs()?;
        let projects = self.scan_projects()?;

        let tech_path = out_dir.join(ResourceKind::Tech.static_file());
        let project_path = out_dir.join(ResourceKind::Project.static_file());

        write_json(&tech_path, &techs)?;
        write_json(&project_path, &projects)?;

        Ok(vec![tech_path, project_path])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetRole {
    Pdf,
    Logo,
    Cover,
}

/// Which project field a file fills, if any
pub fn classify_project_file(name: &str) -> Option<AssetRole> {
    let lower = name.to_lowercase();
    if lower.ends_with(".pdf") {
        Some(AssetRole::Pdf)
    } else if lower == "logo.png" || lower == "logo.svg" {
        Some(AssetRole::Logo)
    } else if lower == "landing.png" || lower == "cover.png" {
        Some(AssetRole::Cover)
    } else {
        None
    }
}

pub fn project_file_url(id: &str, file_name: &str) -> String {
    format!("/api/project/{}/file/{}", id, file_name)
}

/// Language of a tech entry from its file extensions
pub fn detect_language<'a>(names: impl Iterator<Item = &'a str> + Clone) -> &'static str {
    let has = |ext: &str| names.clone().any(|n| n.ends_with(ext));
    if has(".py") {
        "python"
    } else if has(".java") {
        "java"
    } else if has(".js") {
        "javascript"
    } else {
        "unknown"
    }
}

/// Sorted subdirectories; a missing root is empty
fn subdirectories(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        tracing::debug!("{} does not exist", root.display());
        return Ok(Vec::new());
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(root)
        .with_context(|| format!("Failed to list {}", root.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name -> content for every non-hidden file below `dir`
fn read_tech_files(dir: &Path) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        match fs::read_to_string(entry.path()) {
            Ok(content) => {
                files.insert(name, content);
            }
            Err(e) => tracing::warn!("Error reading file {}: {}", entry.path().display(), e),
        }
    }

    files
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_detect_language_priority() {
        assert_eq!(detect_language(["a.js", "b.py"].into_iter()), "python");
        assert_eq!(detect_language(["Main.java", "x.js"].into_iter()), "java");
        assert_eq!(detect_language(["viewer.js"].into_iter()), "javascript");
        assert_eq!(detect_language(["README.md"].into_iter()), "unknown");
    }

    #[test]
    fn test_classify_project_file() {
        assert_eq!(classify_project_file("Thesis.PDF"), Some(AssetRole::Pdf));
        assert_eq!(classify_project_file("Logo.svg"), Some(AssetRole::Logo));
        assert_eq!(classify_project_file("landing.png"), Some(AssetRole::Cover));
        assert_eq!(classify_project_file("screenshot.png"), None);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::new(dir.path().join("nope"), Overrides::default());
        assert!(registry.scan_techs().unwrap().is_empty());
        assert!(registry.scan_projects().unwrap().is_empty());
    }

    #[test]
    fn test_scan_techs_walks_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("tech/DashboardSim/simulator.py"), "print('sim')");
        write(&root.join("tech/DashboardSim/ui/dashboard.py"), "import tkinter");
        write(&root.join("tech/DashboardSim/.DS_Store"), "junk");
        write(&root.join("tech/StockViewer/viewer.js"), "class MarketViewer {}");

        let techs = Registry::new(root, Overrides::default()).scan_techs().unwrap();
        assert_eq!(techs.len(), 2);

        let sim = &techs[0];
        assert_eq!(sim.id, "DashboardSim");
        assert_eq!(sim.language, "python");
        assert_eq!(sim.description, DEFAULT_TECH_DESCRIPTION);
        assert_eq!(
            sim.files.keys().collect::<Vec<_>>(),
            vec!["dashboard.py", "simulator.py"]
        );

        assert_eq!(techs[1].language, "javascript");
    }

    #[test]
    fn test_scan_projects_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("projects/Portfolio/logo.png"), "");
        write(&root.join("projects/Portfolio/landing.png"), "");
        write(&root.join("projects/Portfolio/report.pdf"), "");
        write(&root.join("projects/Portfolio/nested/skip.txt"), "");

        let mut entries = BTreeMap::new();
        entries.insert(
            "portfolio".to_string(),
            RecordOverride {
                title: Some("Portfolio Website".to_string()),
                description: None,
            },
        );

        let projects = Registry::new(root, Overrides::new(&entries))
            .scan_projects()
            .unwrap();
        assert_eq!(projects.len(), 1);

        let p = &projects[0];
        assert_eq!(p.title, "Portfolio Website");
        assert_eq!(p.description, DEFAULT_PROJECT_DESCRIPTION);
        assert_eq!(p.logo.as_deref(), Some("/api/project/Portfolio/file/logo.png"));
        assert_eq!(p.cover.as_deref(), Some("/api/project/Portfolio/file/landing.png"));
        assert_eq!(p.pdf.as_deref(), Some("/api/project/Portfolio/file/report.pdf"));
        assert_eq!(p.files.len(), 3);
    }

    #[test]
    fn test_export_writes_data_files() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploads");
        write(&uploads.join("tech/StockViewer/viewer.js"), "x");

        let out = dir.path().join("site");
        let written = Registry::new(&uploads, Overrides::default())
            .export(&out)
            .unwrap();
        assert_eq!(written.len(), 2);

        let techs: Vec<TechShowcase> =
            serde_json::from_str(&fs::read_to_string(out.join("data/tech.json")).unwrap()).unwrap();
        assert_eq!(techs[0].id, "StockViewer");

        let projects: Vec<Project> =
            serde_json::from_str(&fs::read_to_string(out.join("data/project.json")).unwrap())
                .unwrap();
        assert!(projects.is_empty());
    }
}
