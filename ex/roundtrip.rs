use std::io::Read;
use tempguard::{TempError, TrackedDir, TrackedFile};

fn main() -> Result<(), TempError> {
    // Create a tracked temporary file with initial content.
    let mut file = TrackedFile::create("demo-", "Hello, tracked world!")?;

    // The cursor starts at offset 0, so an immediate read returns the content.
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    println!("Temp file {} holds: {content}", file.path().display());

    // Create a tracked temporary directory and put a file inside it.
    let dir = TrackedDir::create("demo-dir-")?;
    std::fs::write(dir.join("note.txt"), "scratch data")?;
    println!("Temp dir {dir} exists: {}", dir.exists());

    // Bulk teardown: everything either type ever created is reclaimed,
    // each deletion checked against the temporary-directory root.
    TrackedFile::delete_all()?;
    TrackedDir::delete_all()?;
    println!("Everything reclaimed.");

    Ok(())
}
