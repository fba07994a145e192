use crate::commands::SamplingMethod;
use crate::sampling::SamplingContext;
use crate::wildcards::WildcardManager;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

/// Write `files` (relative path, content) into a fresh temporary directory.
pub(crate) fn create_wildcard_dir(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), files);
    temp_dir
}

pub(crate) fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
    }
}

/// A small wildcard tree used across tests:
///
/// - `colors` = red, green, blue
/// - `animals/cats` = tabby, siamese
/// - `animals/dogs` = collie, 2::beagle
/// - `styles.yaml` = `painting` (oil, watercolor) and `photo/film` (kodak)
/// - `.hidden/secret` (ignored)
pub(crate) fn create_sample_wildcards() -> TempDir {
    create_wildcard_dir(&[
        ("colors.txt", "red\ngreen\nblue\n"),
        ("animals/cats.txt", "# cats\ntabby\n\nsiamese\n"),
        ("animals/dogs.txt", "collie\n2::beagle\n"),
        (
            "styles.yaml",
            "painting:\n  - oil\n  - watercolor\nphoto:\n  film:\n    - kodak\n",
        ),
        (".hidden/secret.txt", "nope\n"),
    ])
}

/// Manager over the `colors`, `shapes` and `animals/*` collections.
pub(crate) fn memory_wildcards() -> WildcardManager {
    WildcardManager::from_collections([
        ("colors", vec!["red", "green", "blue"]),
        ("shapes", vec!["square", "circle"]),
        ("animals/cats", vec!["tabby", "siamese"]),
        ("animals/dogs", vec!["collie"]),
    ])
}

/// A deterministic context over `wildcards`.
pub(crate) fn seeded_context(
    wildcards: WildcardManager,
    method: SamplingMethod,
    seed: u64,
) -> SamplingContext {
    SamplingContext::builder()
        .wildcard_manager(Rc::new(wildcards))
        .default_sampling_method(method)
        .seed(seed)
        .build()
}

/// Collect up to `n` prompts from `template`.
pub(crate) fn sample(context: &SamplingContext, template: &str, n: Option<usize>) -> Vec<String> {
    context
        .sample_prompts(template, n)
        .unwrap()
        .collect::<crate::Result<Vec<_>>>()
        .unwrap()
}
