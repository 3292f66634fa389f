//! uconvert - UNIHAN TO JSON CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;

use uconvert::{
    cli::Args,
    discover::{collect_source_files, SourceFilter},
    grouper::{FilenameTemplate, IngestOptions, PropGrouper},
    parser::ParserRegistry,
    stats::Statistics,
};

fn main() -> Result<()> {
    let args = Args::parse();

    // 입출력 경로 확인
    validate_paths(&args)?;

    // 헤더 출력
    print_header(&args);

    // 소스 파일 필터 초기화
    let filter = SourceFilter::new(args.pattern.clone()).map_err(|e| anyhow::anyhow!("{}", e))?;

    // 데이터 파일 수집
    let source_files = collect_source_files(&args.input, &filter, args.max_depth);

    if source_files.is_empty() {
        println!("{}", "⚠️ 처리할 데이터 파일이 없습니다.".yellow());
        return Ok(());
    }

    println!(
        "  {} 발견된 파일 수: {}",
        "📋".bright_white(),
        source_files.len().to_string().bright_green()
    );

    // 드라이런 모드
    if args.dry_run {
        print_dry_run(&source_files);
        return Ok(());
    }

    // 통계 초기화
    let stats = Statistics::new(source_files.len());

    // 출력 폴더 생성
    fs::create_dir_all(&args.output)
        .with_context(|| format!("출력 폴더를 만들 수 없습니다: {:?}", args.output))?;

    // 분류기 초기화
    let template = FilenameTemplate::new(&args.template).map_err(|e| anyhow::anyhow!("{}", e))?;
    let mut grouper =
        PropGrouper::new(&args.output, ParserRegistry::unihan()).with_template(template);

    let mut options = IngestOptions::new();
    if let Some(threshold) = args.mmap_threshold {
        options = options.with_mmap_threshold(threshold);
    }

    // ingest 단계: 레코드를 속성별 스필 버킷으로 분배
    println!("\n{}", "📥 레코드 분류 중...".bright_cyan());
    let pb = create_progress_bar(source_files.len());

    for path in &source_files {
        let report = grouper
            .ingest_path(path, &options)
            .with_context(|| format!("입력 파일 처리 실패: {:?}", path))?;
        stats.add_records(report.appended);
        stats.add_skipped(report.skipped);
        pb.inc(1);

        if args.verbose {
            println!(
                "  {} {:?} ({} 레코드)",
                "✓".green(),
                path.file_name().unwrap_or_default(),
                report.appended
            );
        }
    }

    pb.finish_with_message("완료!");

    // drain 단계: 속성마다 스필을 재생해 JSON 파일 생성
    println!(
        "\n{} {} 개 속성 발견, JSON 파일 저장 중...",
        "💾".bright_cyan(),
        grouper.property_count().to_string().bright_green()
    );

    for result in grouper.drain() {
        let drained = result?;
        stats.increment_file_written();
        stats.add_entries(drained.entries);
        stats.add_bytes_written(drained.bytes_written);

        println!(
            "  {} {}: {:?}",
            "✓".green(),
            drained.property.bright_white(),
            drained.path
        );
        if args.verbose {
            println!("    {} 항목", drained.entries);
        }
    }

    // 통계 출력
    stats.print_summary();

    println!("\n{} 변환 완료: {:?}\n", "✅".bright_green(), args.output);

    Ok(())
}

/// 입출력 경로 유효성 검사
fn validate_paths(args: &Args) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("입력 폴더가 존재하지 않습니다: {:?}", args.input);
    }

    if !args.input.is_dir() {
        anyhow::bail!("입력 경로가 폴더가 아닙니다: {:?}", args.input);
    }

    if args.output.is_file() {
        anyhow::bail!("출력 경로가 이미 파일로 존재합니다: {:?}", args.output);
    }

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!(
        "{}",
        " 🈯 UNIHAN TO JSON CONVERTER".bright_white().bold()
    );
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 폴더: {:?}", "📂".bright_cyan(), args.input);

    if !args.dry_run {
        println!("  {} 출력 폴더: {:?}", "📄".bright_green(), args.output);
        println!("  {} 템플릿: {}", "⚙️".bright_yellow(), args.template);
    }

    if let Some(ref pattern) = args.pattern {
        println!("  {} 패턴 필터: {}", "🔍".bright_magenta(), pattern);
    }

    if let Some(depth) = args.max_depth {
        println!("  {} 최대 깊이: {}", "📏".bright_white(), depth);
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("\n{}", "📁 파일 검색 중...".bright_cyan());
}

/// 드라이런 출력
fn print_dry_run(source_files: &[PathBuf]) {
    println!("\n{}", "📋 처리 예정 파일 목록:".bright_cyan());
    for (i, path) in source_files.iter().enumerate() {
        println!("  {}. {:?}", i + 1, path.file_name().unwrap_or_default());
    }
    println!(
        "\n{} 총 {} 개의 파일이 처리될 예정입니다.",
        "ℹ️".bright_blue(),
        source_files.len().to_string().bright_green()
    );
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("█▓▒░"),
    );
    pb
}
