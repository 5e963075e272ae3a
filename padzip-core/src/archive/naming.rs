use std::collections::HashSet;
use std::path::Path;

/// Assigns container entry names from source base names.
///
/// ZIP writers refuse duplicate names, so a repeated base name gets a `-N`
/// suffix before its extension: `tool.exe`, `tool-1.exe`, `tool-2.exe`.
#[derive(Debug, Default)]
pub struct EntryNames {
    taken: HashSet<String>,
}

impl EntryNames {
    pub fn assign(&mut self, src: &Path) -> String {
        let base = src
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "entry".to_string());
        if self.taken.insert(base.clone()) {
            return base;
        }

        let (stem, ext) = match base.rfind('.') {
            Some(i) if i > 0 => (&base[..i], &base[i..]),
            _ => (base.as_str(), ""),
        };
        let mut n = 1usize;
        loop {
            let candidate = format!("{stem}-{n}{ext}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories() {
        let mut names = EntryNames::default();
        assert_eq!(names.assign(Path::new("/tmp/out/tool.exe")), "tool.exe");
        assert_eq!(names.assign(Path::new("lib.dll")), "lib.dll");
    }

    #[test]
    fn duplicates_get_suffixes() {
        let mut names = EntryNames::default();
        assert_eq!(names.assign(Path::new("a/tool.exe")), "tool.exe");
        assert_eq!(names.assign(Path::new("b/tool.exe")), "tool-1.exe");
        assert_eq!(names.assign(Path::new("a/tool.exe")), "tool-2.exe");
        assert_eq!(names.assign(Path::new("README")), "README");
        assert_eq!(names.assign(Path::new("x/README")), "README-1");
        assert_eq!(names.assign(Path::new(".hidden")), ".hidden");
        assert_eq!(names.assign(Path::new("y/.hidden")), ".hidden-1");
    }

    #[test]
    fn suffix_skips_names_already_in_use() {
        let mut names = EntryNames::default();
        names.assign(Path::new("a-1.bin"));
        names.assign(Path::new("a.bin"));
        assert_eq!(names.assign(Path::new("z/a.bin")), "a-2.bin");
    }
}
