//! Keeps `tests/unit` a mirror of `src` and every test file non-empty

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::Path;

    // Files that only wire modules together
    fn is_organizational(relative: &str) -> bool {
        relative == "main.rs" || relative == "lib.rs" || relative.ends_with("mod.rs")
    }

    /// Relative paths of every directory and `.rs` file below `base`
    fn tree(base: &Path) -> io::Result<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        walk(base, base, &mut found)?;
        Ok(found)
    }

    fn walk(dir: &Path, base: &Path, found: &mut BTreeSet<String>) -> io::Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let relative = path
                .strip_prefix(base)
                .map_err(|error| io::Error::other(error.to_string()))?
                .to_string_lossy()
                .replace('\\', "/");
            if path.is_dir() {
                found.insert(relative);
                walk(&path, base, found)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                found.insert(relative);
            }
        }
        Ok(())
    }

    fn listing(prefix: &str, paths: &[&String]) -> String {
        paths
            .iter()
            .map(|path| format!("  - {prefix}{path}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_every_source_has_unit_tests() {
        let Ok(sources) = tree(Path::new("src")) else {
            panic!("src directory should be readable");
        };
        let tests = tree(Path::new("tests/unit")).unwrap_or_default();

        let missing: Vec<&String> = sources
            .iter()
            .filter(|path| !is_organizational(path) && !tests.contains(*path))
            .collect();
        assert!(
            missing.is_empty(),
            "Sources without a tests/unit counterpart:\n{}",
            listing("src/", &missing)
        );
    }

    #[test]
    fn test_every_unit_test_has_a_source() {
        let Ok(sources) = tree(Path::new("src")) else {
            panic!("src directory should be readable");
        };
        let tests = tree(Path::new("tests/unit")).unwrap_or_default();

        let orphaned: Vec<&String> = tests
            .iter()
            .filter(|path| !path.ends_with("mod.rs") && !sources.contains(*path))
            .collect();
        assert!(
            orphaned.is_empty(),
            "Unit tests whose source file is gone:\n{}",
            listing("tests/unit/", &orphaned)
        );
    }

    #[test]
    fn test_every_test_file_has_tests() {
        let root = Path::new("tests");
        let Ok(files) = tree(root) else {
            panic!("tests directory should be readable");
        };

        let empty: Vec<&String> = files
            .iter()
            .filter(|path| path.ends_with(".rs") && !path.ends_with("mod.rs"))
            .filter(|path| {
                fs::read_to_string(root.join(path.as_str()))
                    .map(|content| !content.contains("#[test]"))
                    .unwrap_or(true)
            })
            .collect();
        assert!(
            empty.is_empty(),
            "Test files without any #[test] function:\n{}",
            listing("tests/", &empty)
        );
    }

    #[test]
    fn test_benches_are_declared() {
        let manifest = fs::read_to_string("Cargo.toml").unwrap_or_default();
        let Ok(benches) = tree(Path::new("benches")) else {
            panic!("benches directory should be readable");
        };

        let undeclared: Vec<&String> = benches
            .iter()
            .filter(|file| {
                let name = file.trim_end_matches(".rs");
                !manifest.contains(&format!("name = \"{name}\""))
            })
            .collect();
        assert!(
            undeclared.is_empty(),
            "Benches missing a [[bench]] entry:\n{}",
            listing("benches/", &undeclared)
        );
    }
}
