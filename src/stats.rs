//! 통계 및 유틸리티 모듈
//!
//! 변환 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// 변환 통계 구조체
#[derive(Debug, Default)]
pub struct Statistics {
    /// 총 입력 파일 수
    pub total_files: usize,
    /// 분류된 레코드 수
    pub records_ingested: AtomicU64,
    /// 건너뛴 줄 수 (빈 줄/주석)
    pub lines_skipped: AtomicU64,
    /// 생성된 속성 파일 수
    pub files_written: AtomicUsize,
    /// 문서에 쓰인 항목 수
    pub entries_written: AtomicU64,
    /// 쓴 총 바이트
    pub total_bytes_written: AtomicU64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 분류된 레코드 수 추가
    pub fn add_records(&self, count: u64) {
        self.records_ingested.fetch_add(count, Ordering::Relaxed);
    }

    /// 건너뛴 줄 수 추가
    pub fn add_skipped(&self, count: u64) {
        self.lines_skipped.fetch_add(count, Ordering::Relaxed);
    }

    /// 생성된 속성 파일 카운트 증가
    pub fn increment_file_written(&self) {
        self.files_written.fetch_add(1, Ordering::Relaxed);
    }

    /// 쓰인 항목 수 추가
    pub fn add_entries(&self, count: u64) {
        self.entries_written.fetch_add(count, Ordering::Relaxed);
    }

    /// 쓴 바이트 추가
    pub fn add_bytes_written(&self, bytes: u64) {
        self.total_bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// 분류된 레코드 수 반환
    pub fn get_records_ingested(&self) -> u64 {
        self.records_ingested.load(Ordering::Relaxed)
    }

    /// 건너뛴 줄 수 반환
    pub fn get_lines_skipped(&self) -> u64 {
        self.lines_skipped.load(Ordering::Relaxed)
    }

    /// 생성된 속성 파일 수 반환
    pub fn get_files_written(&self) -> usize {
        self.files_written.load(Ordering::Relaxed)
    }

    /// 쓰인 항목 수 반환
    pub fn get_entries_written(&self) -> u64 {
        self.entries_written.load(Ordering::Relaxed)
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    /// 변환 통계 요약 출력
    pub fn print_summary(&self) {
        let records = self.get_records_ingested();
        let skipped = self.get_lines_skipped();
        let properties = self.get_files_written();
        let entries = self.get_entries_written();
        let bytes_written = self.total_bytes_written.load(Ordering::Relaxed);
        let elapsed = self.elapsed();

        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 입력 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} 레코드:       {}",
            "📥".bright_yellow(),
            records.to_string().green()
        );
        println!("  {} 건너뛴 줄:    {}", "💬".bright_white(), skipped);
        println!(
            "  {} 속성 파일:    {}",
            "📄".bright_green(),
            properties.to_string().green()
        );
        println!("  {} 쓴 항목:      {}", "🔤".bright_magenta(), entries);
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(bytes_written)
        );
        println!(
            "  {} 처리 시간:    {:.2}초",
            "⏱️".bright_cyan(),
            elapsed.as_secs_f64()
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use uconvert::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
