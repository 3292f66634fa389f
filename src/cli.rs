//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

/// uconvert CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "uconvert",
    author = "YourName <your@email.com>",
    version,
    about = "UNIHAN TO JSON CONVERTER - Unihan 속성 데이터베이스를 속성별 JSON 파일로 변환하는 CLI 도구",
    long_about = r#"
UNIHAN TO JSON CONVERTER
========================

탭 구분 Unihan 데이터 파일(코드포인트, 속성, 값)을 읽어
속성 이름마다 하나씩, 문자 → 파싱된 값 매핑 JSON 문서를 생성합니다.

특징:
  • 스트리밍 분류로 메모리보다 큰 입력 처리
  • 속성 이름별 값 파서 테이블 (정수/목록/읽기표 등)
  • "U+XXXX" 코드포인트 표기 디코딩
  • glob 패턴 필터 및 드라이런 모드
  • 진행률 표시 및 상세 통계

예제:
  uconvert -i ./UNIHAN -o ./json
  uconvert -i ./UNIHAN -o ./json --template "unihan-{0}.json"
  uconvert -i ./UNIHAN --pattern "Unihan_Readings*" --verbose
  uconvert -i ./UNIHAN --dry-run
"#
)]
pub struct Args {
    /// Unihan 데이터 파일(.txt)들이 있는 입력 폴더 경로
    #[arg(short, long)]
    pub input: PathBuf,

    /// 속성별 JSON 파일이 생성될 출력 폴더 (기본값: unihan-json)
    #[arg(short, long, default_value = "unihan-json")]
    pub output: PathBuf,

    /// 출력 파일 이름 템플릿 ("{0}" 자리에 속성 이름)
    #[arg(short, long, default_value = "{0}.json")]
    pub template: String,

    /// 파일 이름 패턴 필터 (glob 형식, 예: "Unihan_Read*")
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 최대 폴더 탐색 깊이
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// 대용량 파일 메모리 매핑 임계값 (바이트, 기본값: 10MB)
    #[arg(long)]
    pub mmap_threshold: Option<u64>,
}
