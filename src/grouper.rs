//! 속성별 분류 모듈
//!
//! 레코드 스트림을 속성별 임시 스필 파일로 분배(ingest)한 뒤,
//! 속성마다 스필을 재생하며 JSON 문서를 생성(drain)하는 2단계
//! 파이프라인을 담당합니다. 값 파싱은 전부 drain 단계로 미루므로
//! 메모리보다 큰 입력도 한 줄씩 처리할 수 있습니다.

use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::codepoint::decode_one;
use crate::error::{Result, UConvertError};
use crate::parser::ParserRegistry;

/// 출력 파일 이름 템플릿
///
/// `{0}` 자리에 속성 이름이 들어갑니다 (예: `"{0}.json"` →
/// `kTotalStrokes.json`).
#[derive(Debug, Clone)]
pub struct FilenameTemplate {
    template: String,
}

/// 기본 파일 이름 템플릿
pub const DEFAULT_FILENAME_TEMPLATE: &str = "{0}.json";

impl FilenameTemplate {
    /// 템플릿 생성 (`{0}` 자리가 없으면 에러)
    pub fn new(template: &str) -> Result<Self> {
        if !template.contains("{0}") {
            return Err(UConvertError::InvalidTemplate {
                template: template.to_string(),
            });
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    /// 속성 이름을 넣어 파일 이름으로 확장
    pub fn expand(&self, property: &str) -> String {
        self.template.replace("{0}", property)
    }
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_FILENAME_TEMPLATE.to_string(),
        }
    }
}

/// 속성 하나의 스필 버킷
///
/// 익명 임시 파일에 레코드를 추가만 하고, drain 때 처음부터 한 번
/// 재생합니다. 파일 핸들이 닫히면 저장 공간도 함께 해제됩니다.
struct PropSpill {
    writer: BufWriter<File>,
}

impl PropSpill {
    fn create(property: &str) -> Result<Self> {
        let file = tempfile::tempfile().map_err(|e| UConvertError::Spill {
            property: property.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn append(&mut self, property: &str, record: &str) -> Result<()> {
        writeln!(self.writer, "{}", record).map_err(|e| UConvertError::Spill {
            property: property.to_string(),
            reason: e.to_string(),
        })
    }

    /// 추가를 끝내고 재생용 리더로 전환
    fn into_reader(self, property: &str) -> Result<BufReader<File>> {
        let mut file = self
            .writer
            .into_inner()
            .map_err(|e| UConvertError::Spill {
                property: property.to_string(),
                reason: e.to_string(),
            })?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| UConvertError::Spill {
                property: property.to_string(),
                reason: e.to_string(),
            })?;
        Ok(BufReader::new(file))
    }
}

/// ingest 옵션
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// 대용량 파일 임계값 (이상이면 메모리 매핑 사용)
    pub mmap_threshold: u64,
}

impl IngestOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// 한 줄 ingest의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// 레코드가 스필 버킷에 추가됨
    Appended,
    /// 빈 줄 또는 주석이라 건너뜀
    Skipped,
}

/// 파일 하나를 ingest한 결과
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestReport {
    /// 버킷에 추가된 레코드 수
    pub appended: u64,
    /// 건너뛴 줄 수 (빈 줄/주석)
    pub skipped: u64,
}

/// drain된 속성 하나의 결과
///
/// drain 이터레이터가 이 값을 내놓는 시점에는 해당 JSON 파일이
/// 완전히 쓰이고 닫힌 뒤입니다.
#[derive(Debug)]
pub struct DrainedProp {
    /// 속성 이름
    pub property: String,
    /// 생성된 JSON 파일 경로
    pub path: PathBuf,
    /// 문서에 쓰인 항목 수
    pub entries: u64,
    /// 쓰인 바이트 수
    pub bytes_written: u64,
}

/// 속성별 분류기
///
/// `ingest`를 반복 호출해 레코드를 분배한 다음, `drain`을 한 번 호출해
/// 속성별 JSON 파일을 생성합니다. drain 이후의 ingest는 계약 밖이며,
/// drain 없이 버리면 스필 저장 공간만 해제되고 출력은 만들어지지
/// 않습니다.
pub struct PropGrouper {
    dest_dir: PathBuf,
    template: FilenameTemplate,
    registry: ParserRegistry,
    // 최초 등장 순서 유지 목록 + 이름 조회 인덱스
    buckets: Vec<(String, PropSpill)>,
    index: HashMap<String, usize>,
}

impl PropGrouper {
    /// 새 분류기 생성
    pub fn new(dest_dir: impl Into<PathBuf>, registry: ParserRegistry) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            template: FilenameTemplate::default(),
            registry,
            buckets: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 파일 이름 템플릿 설정
    pub fn with_template(mut self, template: FilenameTemplate) -> Self {
        self.template = template;
        self
    }

    /// 지금까지 발견된 속성 수
    pub fn property_count(&self) -> usize {
        self.buckets.len()
    }

    /// 입력 한 줄을 분류
    ///
    /// 빈 줄과 `#` 주석은 건너뜁니다. 그 외의 줄은 탭으로 3개 필드로
    /// 나뉘어야 하며, 속성 이름의 버킷에 원본 레코드(줄 끝 문자 제외)가
    /// 추가됩니다. 이 단계에서는 값 파싱이나 코드포인트 디코딩을 하지
    /// 않습니다.
    pub fn ingest(&mut self, line: &str) -> Result<IngestOutcome> {
        let ltrimmed = line.trim_start();
        if ltrimmed.is_empty() || ltrimmed.starts_with('#') {
            return Ok(IngestOutcome::Skipped);
        }

        let record = line.trim_end_matches(|c| c == '\r' || c == '\n');
        let (_, property, _) = split_record(record)?;

        let idx = match self.index.get(property) {
            Some(&idx) => idx,
            None => {
                let spill = PropSpill::create(property)?;
                self.buckets.push((property.to_string(), spill));
                let idx = self.buckets.len() - 1;
                self.index.insert(property.to_string(), idx);
                idx
            }
        };

        let (name, spill) = &mut self.buckets[idx];
        spill.append(name, record)?;
        Ok(IngestOutcome::Appended)
    }

    /// 소스 파일 하나를 통째로 ingest
    ///
    /// 임계값 이상의 큰 파일은 메모리 매핑으로, 그보다 작은 파일은
    /// 버퍼 리더로 읽습니다.
    pub fn ingest_path(&mut self, path: &Path, options: &IngestOptions) -> Result<IngestReport> {
        let file = File::open(path).map_err(|e| UConvertError::FileOpen {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);

        if file_size >= options.mmap_threshold {
            self.ingest_mmap(path, &file)
        } else {
            self.ingest_reader(BufReader::new(file), path)
        }
    }

    /// 버퍼 리더를 사용한 ingest
    fn ingest_reader<R: BufRead>(&mut self, mut reader: R, path: &Path) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut line = String::new();
        loop {
            line.clear();
            let n = reader.read_line(&mut line).map_err(|e| {
                if e.kind() == ErrorKind::InvalidData {
                    UConvertError::Encoding {
                        file: path.to_path_buf(),
                    }
                } else {
                    UConvertError::FileRead {
                        file: path.to_path_buf(),
                        reason: e.to_string(),
                    }
                }
            })?;
            if n == 0 {
                break;
            }
            match self.ingest(&line)? {
                IngestOutcome::Appended => report.appended += 1,
                IngestOutcome::Skipped => report.skipped += 1,
            }
        }
        Ok(report)
    }

    /// 메모리 매핑을 사용한 ingest (대용량 파일용)
    fn ingest_mmap(&mut self, path: &Path, file: &File) -> Result<IngestReport> {
        let mmap = unsafe {
            Mmap::map(file).map_err(|e| UConvertError::FileOpen {
                file: path.to_path_buf(),
                reason: format!("메모리 매핑 실패: {}", e),
            })?
        };
        let text = std::str::from_utf8(&mmap).map_err(|_| UConvertError::Encoding {
            file: path.to_path_buf(),
        })?;

        let mut report = IngestReport::default();
        for line in text.lines() {
            match self.ingest(line)? {
                IngestOutcome::Appended => report.appended += 1,
                IngestOutcome::Skipped => report.skipped += 1,
            }
        }
        Ok(report)
    }

    /// 속성별 JSON 파일을 생성하는 지연 이터레이터 반환
    ///
    /// `next()` 호출마다 버킷 하나를 최초 등장 순서대로 재생해 파일을
    /// 완전히 쓴 뒤 `(속성, 경로)` 결과를 내놓습니다. 버킷 저장 공간은
    /// 소비되는 즉시 해제되므로 두 번째 `drain`은 아무것도 내놓지 않는
    /// no-op입니다.
    pub fn drain(&mut self) -> Drain<'_> {
        self.index.clear();
        let buckets = std::mem::take(&mut self.buckets);
        Drain {
            buckets: buckets.into_iter(),
            dest_dir: &self.dest_dir,
            template: &self.template,
            registry: &self.registry,
        }
    }
}

/// drain 단계의 지연 이터레이터
pub struct Drain<'a> {
    buckets: std::vec::IntoIter<(String, PropSpill)>,
    dest_dir: &'a Path,
    template: &'a FilenameTemplate,
    registry: &'a ParserRegistry,
}

impl Iterator for Drain<'_> {
    type Item = Result<DrainedProp>;

    fn next(&mut self) -> Option<Self::Item> {
        let (property, spill) = self.buckets.next()?;
        Some(drain_bucket(
            property,
            spill,
            self.dest_dir,
            self.template,
            self.registry,
        ))
    }
}

/// 탭 기준 최대 3개 필드 분리 (`값` 필드는 탭을 더 포함할 수 있음)
fn split_record(record: &str) -> Result<(&str, &str, &str)> {
    let mut fields = record.splitn(3, '\t');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(code), Some(property), Some(value)) => Ok((code, property, value)),
        _ => Err(UConvertError::MalformedRecord {
            line: record.to_string(),
        }),
    }
}

/// 버킷 하나를 재생해 JSON 문서 파일 생성
fn drain_bucket(
    property: String,
    spill: PropSpill,
    dest_dir: &Path,
    template: &FilenameTemplate,
    registry: &ParserRegistry,
) -> Result<DrainedProp> {
    let write_err = |e: std::io::Error| UConvertError::Write {
        reason: e.to_string(),
    };

    let path = dest_dir.join(template.expand(&property));
    let reader = spill.into_reader(&property)?;
    let parser = registry.parser_for(&property);

    let file = File::create(&path).map_err(|e| UConvertError::FileCreate {
        file: path.clone(),
        reason: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);

    writer.write_all(b"{").map_err(write_err)?;
    let mut first = true;
    let mut entries = 0u64;

    for line in reader.lines() {
        let line = line.map_err(|e| UConvertError::Spill {
            property: property.clone(),
            reason: e.to_string(),
        })?;
        let (code, _, value) = split_record(&line)?;

        // 키는 단일 문자여야 하므로 목록 디코더가 아닌 단일 디코더 사용
        let character = decode_one(code)?;
        let parsed = parser.parse(value)?;

        let key = serde_json::to_string(&character.to_string())
            .map_err(|e| UConvertError::Write {
                reason: e.to_string(),
            })?;
        let json_value = serde_json::to_string(&parsed).map_err(|e| UConvertError::Write {
            reason: e.to_string(),
        })?;

        if first {
            writer.write_all(b"\n").map_err(write_err)?;
            first = false;
        } else {
            writer.write_all(b",\n").map_err(write_err)?;
        }
        write!(writer, "\t{}:{}", key, json_value).map_err(write_err)?;
        entries += 1;
    }

    writer.write_all(b"\n}\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    let bytes_written = writer.get_ref().metadata().map(|m| m.len()).unwrap_or(0);

    Ok(DrainedProp {
        property,
        path,
        entries,
        bytes_written,
    })
}
