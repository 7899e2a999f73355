use std::io;
use std::path::{Component, Path, PathBuf};

/// Destination for extracted images.
pub trait ImageSink {
    fn store(&mut self, name: &str, data: &[u8]) -> io::Result<()>;

    /// Link target to put in the Markdown for an image stored as `name`.
    fn link_target(&self, name: &str) -> String;
}

/// Writes images into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirImageSink {
    dir: PathBuf,
    link_prefix: String,
}

impl DirImageSink {
    pub fn new(dir: impl Into<PathBuf>, link_prefix: impl Into<String>) -> Self {
        DirImageSink {
            dir: dir.into(),
            link_prefix: link_prefix.into(),
        }
    }

    /// Sink for images referenced from `markdown`, with links relative to it.
    pub fn for_markdown(markdown: &Path, image_dir: &Path) -> Self {
        DirImageSink::new(image_dir, relative_link_prefix(markdown, image_dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for DirImageSink {
    fn store(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        let path = self.dir.join(name);
        std::fs::create_dir_all(&self.dir)
            .and_then(|()| std::fs::write(&path, data))
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    }

    fn link_target(&self, name: &str) -> String {
        if self.link_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.link_prefix, name)
        }
    }
}

/// `image_dir` relative to the directory holding `markdown`, `/`-separated.
/// Unrelated directories fall back to their last component.
fn relative_link_prefix(markdown: &Path, image_dir: &Path) -> String {
    let base = markdown.parent().unwrap_or(Path::new(""));
    let relative = match image_dir.strip_prefix(base) {
        Ok(rel) => rel,
        Err(_) => image_dir.file_name().map(Path::new).unwrap_or(Path::new("")),
    };
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
