use tempguard::{temp_root, PathGuard, TempError};

fn main() {
    let guard = PathGuard::new();

    // Anything under the temporary-directory root can be deleted.
    let scratch = temp_root().join("guard-demo.txt");
    std::fs::write(&scratch, "ephemeral").expect("write scratch file");
    println!(
        "{} safe to delete: {}",
        scratch.display(),
        guard.is_safe(&scratch)
    );
    guard.guarded_delete(&scratch).expect("delete scratch file");

    // Relative paths are expanded against the working directory first, and
    // anything that lands outside the root is refused.
    match guard.guarded_delete("Cargo.toml") {
        Err(TempError::UnsafeDeletion(path)) => println!("refused: {}", path.display()),
        other => println!("unexpected outcome: {other:?}"),
    }
}
