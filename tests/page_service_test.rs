//! Tests for PageService

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use treesites::application::services::PageService;
use treesites::application::ApplicationError;
use treesites::config::Settings;
use treesites::domain::DomainError;
use treesites::infrastructure::traits::{FileSystem, RealFileSystem};
use treesites::infrastructure::ServiceContainer;

const TREE: &str = include_str!("resources/tree.svg");

/// In-memory filesystem recording writes.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }

    fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn service(fs: Arc<dyn FileSystem>) -> PageService {
    ServiceContainer::with_deps(Settings::default(), fs).page_service()
}

#[test]
fn given_missing_file_when_loading_then_document_not_found() {
    let svc = service(Arc::new(MemoryFileSystem::default()));
    let err = svc.load(Path::new("/nope.svg")).unwrap_err();
    assert!(matches!(err, ApplicationError::DocumentNotFound(_)));
}

#[test]
fn given_malformed_file_when_loading_then_parse_error() {
    let svc = service(Arc::new(MemoryFileSystem::with_file("/bad.svg", "<svg><g></svg>")));
    let err = svc.load(Path::new("/bad.svg")).unwrap_err();
    assert!(matches!(err, ApplicationError::Domain(DomainError::Parse(_))));
}

#[test]
fn given_tree_when_loading_then_query_input_bound() {
    let svc = service(Arc::new(MemoryFileSystem::with_file("/tree.svg", TREE)));
    let page = svc.load(Path::new("/tree.svg")).unwrap();
    assert!(page.input().is_bound());
    assert_eq!(page.query(), "");
}

#[test]
fn given_update_without_output_when_applied_then_rewrites_input() {
    let fs = Arc::new(MemoryFileSystem::with_file("/tree.svg", TREE));
    let svc = service(fs.clone());
    let controller = ServiceContainer::with_deps(Settings::default(), fs.clone()).controller();

    svc.update(Path::new("/tree.svg"), None, |page| {
        page.set_query("grape");
        controller.search(page);
        Ok(())
    })
    .unwrap();

    let saved = fs.content("/tree.svg").unwrap();
    assert!(saved.contains(r#"style="display: inline; font-size: 10px; fill: blue">grape</text>"#));
    assert!(saved.contains(r#"value="grape""#));
}

#[test]
fn given_update_with_output_when_applied_then_input_untouched() {
    let fs = Arc::new(MemoryFileSystem::with_file("/tree.svg", TREE));
    let svc = service(fs.clone());

    svc.update(Path::new("/tree.svg"), Some(Path::new("/out.svg")), |_| Ok(()))
        .unwrap();

    assert_eq!(fs.content("/tree.svg").as_deref(), Some(TREE));
    assert!(fs.content("/out.svg").unwrap().contains("banana"));
}

#[test]
fn given_failing_operation_when_update_then_nothing_written() {
    let fs = Arc::new(MemoryFileSystem::with_file("/tree.svg", TREE));
    let svc = service(fs.clone());

    let result: Result<(), _> = svc.update(Path::new("/tree.svg"), Some(Path::new("/out.svg")), |_| {
        Err(DomainError::MarkerNotFound("leaf #9".into()).into())
    });

    assert!(result.is_err());
    assert!(fs.content("/out.svg").is_none());
}

#[test]
fn given_real_filesystem_when_saving_to_nested_path_then_creates_dirs() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("tree.svg");
    std::fs::write(&input, TREE).unwrap();
    let output = temp.path().join("out/highlighted/tree.svg");

    let svc = service(Arc::new(RealFileSystem));
    let page = svc.load(&input).unwrap();
    svc.save(&page, &output).unwrap();

    let reloaded = svc.load(&output).unwrap();
    assert_eq!(
        reloaded.document.descendants().count(),
        page.document.descendants().count()
    );
}
