//! 입력 파일 탐색 모듈
//!
//! 입력 폴더에서 Unihan 데이터 파일(.txt)을 찾고 glob 패턴으로
//! 거르는 일을 담당합니다.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, UConvertError};

/// 소스 파일 이름 필터
///
/// 확장자 필터(.txt)는 항상 적용되고, glob 패턴은 선택적으로
/// 추가됩니다.
#[derive(Default)]
pub struct SourceFilter {
    pattern: Option<Pattern>,
}

impl SourceFilter {
    /// 새 필터 생성
    ///
    /// # Arguments
    /// * `pattern` - glob 패턴 문자열 (None이면 모든 파일 이름 매칭)
    ///
    /// # Examples
    /// ```
    /// use uconvert::discover::SourceFilter;
    ///
    /// let filter = SourceFilter::new(Some("Unihan_*".to_string())).unwrap();
    /// assert!(filter.matches("Unihan_Readings.txt"));
    /// assert!(!filter.matches("other.txt"));
    /// ```
    pub fn new(pattern: Option<String>) -> Result<Self> {
        let compiled = match pattern {
            Some(ref p) => Some(
                Pattern::new(p)
                    .map_err(|_| UConvertError::InvalidPattern { pattern: p.clone() })?,
            ),
            None => None,
        };

        Ok(Self { pattern: compiled })
    }

    /// 파일 이름이 패턴과 일치하는지 확인 (패턴이 없으면 항상 true)
    pub fn matches(&self, file_name: &str) -> bool {
        match &self.pattern {
            Some(p) => p.matches(file_name),
            None => true,
        }
    }

    /// 패턴이 설정되어 있는지 확인
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }
}

/// 입력 폴더에서 소스 파일 수집
///
/// `.txt` 확장자의 일반 파일만 수집하며, 결과는 경로 기준으로 정렬해
/// ingest 순서를 결정적으로 만듭니다.
pub fn collect_source_files(
    input: &Path,
    filter: &SourceFilter,
    max_depth: Option<usize>,
) -> Vec<PathBuf> {
    let walker = match max_depth {
        Some(depth) => WalkDir::new(input).max_depth(depth),
        None => WalkDir::new(input),
    };

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| s.eq_ignore_ascii_case("txt"))
                .unwrap_or(false)
        })
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| filter.matches(s))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "U+4E00\tkTotalStrokes\t1\n").unwrap();
        path
    }

    #[test]
    fn test_collects_only_txt_files() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "Unihan_Readings.txt");
        create_file(temp_dir.path(), "Unihan_Variants.txt");
        create_file(temp_dir.path(), "notes.md");

        let filter = SourceFilter::new(None).unwrap();
        let files = collect_source_files(temp_dir.path(), &filter, None);

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_result_is_sorted_by_path() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "b.txt");
        create_file(temp_dir.path(), "a.txt");
        create_file(temp_dir.path(), "c.txt");

        let filter = SourceFilter::new(None).unwrap();
        let files = collect_source_files(temp_dir.path(), &filter, None);

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_pattern_filter() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "Unihan_Readings.txt");
        create_file(temp_dir.path(), "Unihan_Variants.txt");
        create_file(temp_dir.path(), "other.txt");

        let filter = SourceFilter::new(Some("Unihan_*".to_string())).unwrap();
        let files = collect_source_files(temp_dir.path(), &filter, None);

        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_max_depth() {
        let temp_dir = TempDir::new().unwrap();
        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        create_file(temp_dir.path(), "root.txt");
        create_file(&sub_dir, "nested.txt");

        let filter = SourceFilter::new(None).unwrap();
        let files = collect_source_files(temp_dir.path(), &filter, Some(1));

        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = SourceFilter::new(Some("[invalid".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_has_pattern() {
        let with_pattern = SourceFilter::new(Some("*.txt".to_string())).unwrap();
        let without_pattern = SourceFilter::new(None).unwrap();

        assert!(with_pattern.has_pattern());
        assert!(!without_pattern.has_pattern());
    }
}
