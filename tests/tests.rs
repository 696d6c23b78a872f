#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::{self, Read};
    use std::path::Path;
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tempguard::{temp_root, PathGuard, TempError, TrackedDir, TrackedFile};

    // The per-type registries are process-wide; tests that create tracked
    // instances or drain a registry serialize on this lock.
    static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

    fn registry_lock() -> MutexGuard<'static, ()> {
        REGISTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn guarded_delete_refuses_paths_outside_the_root() {
        let root = tempfile::tempdir().expect("create root");
        let victim = tempfile::tempdir().expect("create victim dir");
        fs::write(victim.path().join("data.txt"), b"keep me").expect("write victim file");

        let guard = PathGuard::with_root(root.path());
        let err = guard
            .guarded_delete(victim.path())
            .expect_err("deletion outside the root must be refused");
        let message = err.to_string();
        assert!(message.contains(&victim.path().display().to_string()));
        match err {
            TempError::UnsafeDeletion(path) => assert_eq!(path, victim.path()),
            other => panic!("expected UnsafeDeletion, got {other:?}"),
        }
        // The refused target is left untouched.
        assert!(victim.path().exists());
        assert!(victim.path().join("data.txt").exists());
    }

    #[test]
    fn guarded_delete_of_missing_path_is_not_an_error() {
        let guard = PathGuard::new();
        let missing = temp_root().join(format!("tempguard-missing-{}", std::process::id()));
        assert!(!missing.exists());
        guard.guarded_delete(&missing).expect("missing path counts as already deleted");
    }

    #[test]
    fn guarded_delete_removes_files_and_directories_recursively() {
        let sandbox = tempfile::tempdir().expect("create sandbox");
        let guard = PathGuard::with_root(sandbox.path());

        let file = sandbox.path().join("single.txt");
        fs::write(&file, b"bytes").expect("write file");
        guard.guarded_delete(&file).expect("delete file");
        assert!(!file.exists());

        let tree = sandbox.path().join("tree");
        fs::create_dir_all(tree.join("deep/deeper")).expect("create tree");
        fs::write(tree.join("deep/deeper/leaf.txt"), b"leaf").expect("write leaf");
        guard.guarded_delete(&tree).expect("delete tree");
        assert!(!tree.exists());
    }

    #[test]
    fn relative_paths_are_expanded_before_the_safety_check() {
        let cwd = std::env::current_dir().expect("read cwd");
        let guard = PathGuard::with_root(&cwd);
        let relative = Path::new("tempguard-relative-probe");

        let effective = guard.effective_path(relative).expect("resolve relative path");
        assert!(effective.is_absolute());
        assert!(guard.is_safe(&effective));
        // Identical to the absolute form: deletable, and missing == success.
        guard.guarded_delete(relative).expect("relative delete");
        guard.guarded_delete(&effective).expect("absolute delete");
    }

    #[test]
    fn guarded_delete_contents_empties_without_removing() {
        let sandbox = tempfile::tempdir().expect("create sandbox");
        let guard = PathGuard::with_root(sandbox.path());

        let dir = sandbox.path().join("workdir");
        fs::create_dir(&dir).expect("create workdir");
        fs::write(dir.join("a.txt"), b"a").expect("write a");
        fs::create_dir(dir.join("nested")).expect("create nested");
        fs::write(dir.join("nested").join("b.txt"), b"b").expect("write b");

        guard.guarded_delete_contents(&dir).expect("empty workdir");
        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).expect("read workdir").count(), 0);

        let outside = tempfile::tempdir().expect("create outside dir");
        let err = guard
            .guarded_delete_contents(outside.path())
            .expect_err("emptying outside the root must be refused");
        assert!(matches!(err, TempError::UnsafeDeletion(_)));
        assert!(outside.path().exists());
    }

    #[test]
    fn tracked_file_roundtrip_and_bulk_teardown() {
        let _lock = registry_lock();
        TrackedFile::delete_all().expect("start from a clean registry");

        let content = b"tracked file contents";
        let mut file = TrackedFile::create("alpha-", content).expect("create tracked file");
        let mut read_back = Vec::new();
        file.read_to_end(&mut read_back).expect("read tracked file");
        assert_eq!(read_back, content);
        assert!(file.path().exists());
        assert!(file.path().starts_with(temp_root()));
        let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("alpha-"), "unexpected file name {name}");

        let anon = TrackedFile::anonymous().expect("create anonymous file");
        let anon_name = anon.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(anon_name.starts_with("anon"), "unexpected file name {anon_name}");
        assert_eq!(TrackedFile::registry().len(), 2);

        // Clones share the underlying handle.
        let alias = file.clone();
        assert!(!alias.is_closed());

        let paths = [file.path().to_path_buf(), anon.path().to_path_buf()];
        TrackedFile::delete_all().expect("bulk teardown");
        assert!(TrackedFile::registry().is_empty());
        for path in &paths {
            assert!(!path.exists(), "{} survived teardown", path.display());
        }
        assert!(file.is_closed());
        assert!(anon.is_closed());
        assert!(alias.is_closed());
        assert!(matches!(
            file.read(&mut [0u8; 4]),
            Err(e) if e.kind() == io::ErrorKind::NotFound
        ));
        assert!(file.metadata().is_err());

        // Re-invocation on the drained registry is a no-op.
        TrackedFile::delete_all().expect("second teardown");
    }

    #[test]
    fn tracked_dir_navigation_and_bulk_teardown() {
        let _lock = registry_lock();
        TrackedDir::delete_all().expect("start from a clean registry");

        let dir = TrackedDir::create("prefix-").expect("create tracked dir");
        assert!(dir.exists());
        assert!(dir.is_dir());
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("prefix-"), "unexpected dir name {name}");
        assert_eq!(dir.parent(), Some(temp_root()));

        let joined = dir.join("notes.txt");
        assert_eq!(joined, dir.path().join("notes.txt"));
        fs::write(&joined, b"scribble").expect("write into dir");
        let rel = dir.strip_prefix(temp_root()).expect("relativize");
        assert_eq!(dir.path(), temp_root().join(rel));
        assert_eq!(dir.to_string(), dir.path().display().to_string());

        dir.clear_contents().expect("empty dir");
        assert!(dir.exists());
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
        fs::write(dir.join("again.txt"), b"more").expect("write again");

        let anon = TrackedDir::anonymous().expect("create anonymous dir");
        let anon_name = anon.file_name().unwrap().to_string_lossy().into_owned();
        assert!(anon_name.starts_with("TmpDir-"), "unexpected dir name {anon_name}");
        assert_eq!(TrackedDir::registry().len(), 2);

        let paths = [dir.path().to_path_buf(), anon.path().to_path_buf()];
        TrackedDir::delete_all().expect("bulk teardown");
        assert!(TrackedDir::registry().is_empty());
        for path in &paths {
            assert!(!path.exists(), "{} survived teardown", path.display());
        }
        TrackedDir::delete_all().expect("second teardown");
    }

    #[test]
    fn file_and_dir_registries_are_independent() {
        let _lock = registry_lock();
        TrackedFile::delete_all().expect("clean file registry");
        TrackedDir::delete_all().expect("clean dir registry");

        let _file = TrackedFile::anonymous().expect("create file");
        assert_eq!(TrackedFile::registry().len(), 1);
        assert!(TrackedDir::registry().is_empty());

        let _dir = TrackedDir::anonymous().expect("create dir");
        assert_eq!(TrackedFile::registry().len(), 1);
        assert_eq!(TrackedDir::registry().len(), 1);

        TrackedFile::delete_all().expect("file teardown");
        assert!(TrackedFile::registry().is_empty());
        assert_eq!(TrackedDir::registry().len(), 1);
        TrackedDir::delete_all().expect("dir teardown");
        assert!(TrackedDir::registry().is_empty());
    }
}
