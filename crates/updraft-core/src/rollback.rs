use std::fs;
use std::io;
use std::path::Path;

use log::debug;

/// How a child entry of the source directory is carried into the rollback
/// tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOp {
    /// Relocate the entry; the source directory is vacated.
    Move,
    /// Duplicate the entry; the source directory is left intact.
    Copy,
}

/// Archive the immediate children of `source_dir` under
/// `version_dir/subfolder`.
///
/// Children whose path equals `rollback_root` or `version_dir` are skipped,
/// which keeps the archiver from descending into its own output when the
/// rollback tree is nested inside the directory being archived.
///
/// # Errors
/// Propagates filesystem errors unchanged. A failure mid-way can leave the
/// target subfolder partially populated; no cleanup is attempted.
pub fn archive(
    source_dir: &Path,
    rollback_root: &Path,
    version_dir: &Path,
    subfolder: &str,
    op: ArchiveOp,
) -> io::Result<()> {
    let target = version_dir.join(subfolder);

    let mut children = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path == rollback_root || path == version_dir {
            continue;
        }
        children.push((path, entry.file_name()));
    }

    fs::create_dir_all(&target)?;
    debug!(
        "Archiving {} entries from {} to {}",
        children.len(),
        source_dir.display(),
        target.display()
    );

    for (child, name) in children {
        let dest = target.join(name);
        match op {
            ArchiveOp::Move => move_entry(&child, &dest)?,
            ArchiveOp::Copy => copy_entry(&child, &dest)?,
        }
    }

    Ok(())
}

fn move_entry(source: &Path, target: &Path) -> io::Result<()> {
    if source.is_file() {
        return fs::rename(source, target);
    }

    if target.is_dir() {
        // Shallow merge: relocate each immediate entry, leaving pre-existing
        // conflicts at deeper levels alone.
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            fs::rename(entry.path(), target.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::rename(source, target)
    }
}

fn copy_entry(source: &Path, target: &Path) -> io::Result<()> {
    if source.is_file() {
        if target.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", target.display()),
            ));
        }
        fs::copy(source, target)?;
        return Ok(());
    }

    if !target.exists() {
        fs::create_dir_all(target)?;
    }
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        copy_entry(&entry.path(), &target.join(entry.file_name()))?;
    }
    Ok(())
}
