use std::fs::File;
use std::path::{Path, PathBuf};
use abp_shared_lib::error::{self, ErrorType};

pub struct FileSandbox {
    output_dir: PathBuf
}

/// only allow writing files inside the output directory
impl FileSandbox {

    pub fn new(output_dir: PathBuf) -> Self {
        FileSandbox { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// path inside the output directory for a name received from the network
    pub fn resolve(&self, file_name: &str) -> error::Result<PathBuf> {
        if file_name.is_empty()
            || file_name.starts_with('/')
            || file_name.contains("..")
            || file_name.contains('/')
            || file_name.contains('\\')
        {
            return Err(ErrorType::InvalidFileName(file_name.to_string()));
        }
        let path = self.output_dir.join(file_name);
        if !path.starts_with(&self.output_dir) {
            return Err(ErrorType::InvalidFileName(file_name.to_string()));
        }
        if path.is_dir() {
            return Err(ErrorType::InvalidFileName(file_name.to_string()));
        }
        Ok(path)
    }

    /// existing files are truncated
    pub fn create_file(&self, file_name: &str) -> error::Result<(PathBuf, File)> {
        let path = self.resolve(file_name)?;
        let file = File::create(&path)?;
        Ok((path, file))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use tempdir::TempDir;
    use test_case::test_case;
    use abp_shared_lib::error::ErrorType;
    use crate::file_sandbox::FileSandbox;

    #[test_case("/etc/passwd"; "absolute path")]
    #[test_case("../escape.txt"; "parent directory")]
    #[test_case("a/../../b"; "nested parent directory")]
    #[test_case("sub/file.txt"; "sub directory")]
    #[test_case("sub\\file.txt"; "windows separator")]
    #[test_case(""; "empty")]
    fn rejects_names_outside_the_sandbox(name: &str) {
        let dir = TempDir::new("abp_test").unwrap();
        let sandbox = FileSandbox::new(dir.path().to_path_buf());
        assert!(matches!(sandbox.resolve(name), Err(ErrorType::InvalidFileName(_))));
    }

    #[test]
    fn rejects_directories() {
        let dir = TempDir::new("abp_test").unwrap();
        fs::create_dir(dir.path().join("taken")).unwrap();
        let sandbox = FileSandbox::new(dir.path().to_path_buf());
        assert!(sandbox.create_file("taken").is_err());
    }

    #[test]
    fn truncates_existing_files() {
        let dir = TempDir::new("abp_test").unwrap();
        fs::write(dir.path().join("out.txt"), b"previous content").unwrap();
        let sandbox = FileSandbox::new(dir.path().to_path_buf());
        let (path, mut file) = sandbox.create_file("out.txt").unwrap();
        file.write_all(b"new").unwrap();
        drop(file);
        assert_eq!(path, dir.path().join("out.txt"));
        assert_eq!(fs::read(path).unwrap(), b"new");
    }
}
