//! 속성 값 파서 모듈
//!
//! 속성 이름별 값 파서 테이블과 각 파서의 구현을 담당합니다.

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::codepoint::decode_many;
use crate::error::{Result, UConvertError};

/// 속성 값 파서의 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueParser {
    /// 원본 문자열 그대로 (미등록 속성의 기본값)
    Identity,
    /// 전체를 10진 정수 하나로 파싱
    Integer,
    /// 공백으로 분리한 문자열 목록
    StringList,
    /// 공백으로 분리한 뒤 각각을 10진 정수로 파싱
    IntegerList,
    /// 공백으로 분리한 코드포인트 표기 목록 ("U+XXXX U+YYYY")
    CodepointList,
    /// "읽기(빈도)" 항목 목록 → 읽기별 빈도 매핑
    FrequencyTable,
    /// "키:값,값,..." 항목 목록 → 키별 값 목록 매핑
    ReadingTable,
    /// "키:값" 항목 목록 → 키별 값 매핑 (중복 키는 마지막 항목 우선)
    PairTable,
}

impl ValueParser {
    /// 원본 값 문자열을 JSON 값으로 파싱
    pub fn parse(&self, raw: &str) -> Result<Value> {
        match self {
            ValueParser::Identity => Ok(Value::String(raw.to_string())),
            ValueParser::Integer => Ok(Value::from(parse_int(raw)?)),
            ValueParser::StringList => Ok(Value::Array(
                raw.split_whitespace()
                    .map(|s| Value::String(s.to_string()))
                    .collect(),
            )),
            ValueParser::IntegerList => Ok(Value::Array(
                raw.split_whitespace()
                    .map(|s| parse_int(s).map(Value::from))
                    .collect::<Result<_>>()?,
            )),
            ValueParser::CodepointList => Ok(Value::Array(
                decode_many(raw)?
                    .into_iter()
                    .map(|c| Value::String(c.to_string()))
                    .collect(),
            )),
            ValueParser::FrequencyTable => parse_frequency_table(raw),
            ValueParser::ReadingTable => parse_reading_table(raw),
            ValueParser::PairTable => parse_pair_table(raw),
        }
    }
}

/// 10진 정수 파싱 (앞뒤 공백 허용)
fn parse_int(text: &str) -> Result<i64> {
    text.trim()
        .parse()
        .map_err(|_| UConvertError::InvalidInteger {
            value: text.to_string(),
        })
}

/// "읽기(빈도)" 항목 목록 파싱 (예: "tsang1(3) zang1(10)")
fn parse_frequency_table(raw: &str) -> Result<Value> {
    let mut table = Map::new();
    for entry in raw.split_whitespace() {
        let malformed = || UConvertError::MalformedFrequencyEntry {
            entry: entry.to_string(),
        };

        // 읽기 부분에는 괄호가 올 수 없고 빈도는 숫자만 허용
        let body = entry.strip_suffix(')').ok_or_else(malformed)?;
        let (reading, digits) = body.split_once('(').ok_or_else(malformed)?;
        if reading.is_empty()
            || reading.contains(')')
            || digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let freq: i64 = digits.parse().map_err(|_| UConvertError::InvalidInteger {
            value: digits.to_string(),
        })?;
        table.insert(reading.to_string(), Value::from(freq));
    }
    Ok(Value::Object(table))
}

/// "키:값,값,..." 항목 목록 파싱 (예: "10297.260:gé,yǐ")
fn parse_reading_table(raw: &str) -> Result<Value> {
    let mut table = Map::new();
    for entry in raw.split_whitespace() {
        let (key, readings) =
            entry
                .split_once(':')
                .ok_or_else(|| UConvertError::MalformedReadingEntry {
                    entry: entry.to_string(),
                })?;
        let values = readings
            .split(',')
            .map(|r| Value::String(r.to_string()))
            .collect();
        table.insert(key.to_string(), Value::Array(values));
    }
    Ok(Value::Object(table))
}

/// "키:값" 항목 목록 파싱 (예: "한:0E 두:0X"), 중복 키는 마지막 항목 우선
fn parse_pair_table(raw: &str) -> Result<Value> {
    let mut table = Map::new();
    for entry in raw.split_whitespace() {
        let (key, value) =
            entry
                .split_once(':')
                .ok_or_else(|| UConvertError::MalformedReadingEntry {
                    entry: entry.to_string(),
                })?;
        table.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(Value::Object(table))
}

/// 속성 이름 → 값 파서 매핑
///
/// 불변 테이블로 쓰이며, 미등록 속성은 항상 [`ValueParser::Identity`]로
/// 대응하므로 조회는 실패하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    table: HashMap<String, ValueParser>,
}

impl ParserRegistry {
    /// 빈 레지스트리 생성 (모든 속성이 Identity로 파싱됨)
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Unihan 내장 파서 테이블 생성
    pub fn unihan() -> Self {
        use ValueParser::*;

        // CHECK: 파서 바인딩을 추가하면 README.md도 함께 갱신할 것
        let bindings = [
            ("kAccountingNumeric", Integer),
            ("kCantonese", StringList),
            ("kFrequency", Integer),
            ("kGB0", Integer),
            ("kGB1", Integer),
            ("kGB3", Integer),
            ("kGB5", Integer),
            ("kGB7", Integer),
            ("kGB8", Integer),
            ("kGradeLevel", Integer),
            ("kHangul", PairTable),
            ("kHanyuPinlu", FrequencyTable),
            ("kHanyuPinyin", ReadingTable),
            ("kJapaneseKun", StringList),
            ("kJapaneseOn", StringList),
            ("kLau", IntegerList),
            ("kNelson", IntegerList),
            ("kOtherNumeric", Integer),
            ("kPrimaryNumeric", Integer),
            ("kSimplifiedVariant", CodepointList),
            ("kTaiwanTelegraph", Integer),
            ("kTang", StringList),
            ("kTotalStrokes", IntegerList),
            ("kTraditionalVariant", CodepointList),
            ("kVietnamese", StringList),
        ];

        Self {
            table: bindings
                .into_iter()
                .map(|(property, parser)| (property.to_string(), parser))
                .collect(),
        }
    }

    /// 파서 바인딩 추가
    pub fn with_parser(mut self, property: &str, parser: ValueParser) -> Self {
        self.table.insert(property.to_string(), parser);
        self
    }

    /// 속성 이름에 대응하는 파서 반환 (미등록이면 Identity)
    pub fn parser_for(&self, property: &str) -> ValueParser {
        self.table
            .get(property)
            .copied()
            .unwrap_or(ValueParser::Identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_returns_raw_string() {
        let value = ValueParser::Identity.parse("anything at all").unwrap();
        assert_eq!(value, json!("anything at all"));
    }

    #[test]
    fn test_integer_parses_trimmed() {
        assert_eq!(ValueParser::Integer.parse("20").unwrap(), json!(20));
        assert_eq!(ValueParser::Integer.parse(" 7 ").unwrap(), json!(7));
        assert_eq!(ValueParser::Integer.parse("-3").unwrap(), json!(-3));
    }

    #[test]
    fn test_integer_rejects_junk() {
        let err = ValueParser::Integer.parse("12a").unwrap_err();
        assert!(err.to_string().contains("12a"));
    }

    #[test]
    fn test_string_list_keeps_order_and_duplicates() {
        let value = ValueParser::StringList.parse("b a a").unwrap();
        assert_eq!(value, json!(["b", "a", "a"]));
    }

    #[test]
    fn test_integer_list() {
        let value = ValueParser::IntegerList.parse("1 22 3").unwrap();
        assert_eq!(value, json!([1, 22, 3]));
        assert!(ValueParser::IntegerList.parse("1 x").is_err());
    }

    #[test]
    fn test_codepoint_list() {
        let value = ValueParser::CodepointList.parse("U+4E00 U+4E8C").unwrap();
        assert_eq!(value, json!(["一", "二"]));
    }

    #[test]
    fn test_codepoint_list_error_contains_input() {
        let err = ValueParser::CodepointList.parse("U+4E00 BAD").unwrap_err();
        assert!(err.to_string().contains("U+4E00 BAD"));
    }

    #[test]
    fn test_frequency_table() {
        let value = ValueParser::FrequencyTable.parse("a(3) bb(10)").unwrap();
        assert_eq!(value, json!({"a": 3, "bb": 10}));
    }

    #[test]
    fn test_frequency_table_rejects_missing_paren() {
        assert!(ValueParser::FrequencyTable.parse("a3)").is_err());
        assert!(ValueParser::FrequencyTable.parse("a(3").is_err());
        assert!(ValueParser::FrequencyTable.parse("(3)").is_err());
        assert!(ValueParser::FrequencyTable.parse("a(x)").is_err());
    }

    #[test]
    fn test_reading_table() {
        let value = ValueParser::ReadingTable
            .parse("10297.260:gé,yǐ 74609.020:yǐ")
            .unwrap();
        assert_eq!(
            value,
            json!({"10297.260": ["gé", "yǐ"], "74609.020": ["yǐ"]})
        );
    }

    #[test]
    fn test_reading_table_rejects_missing_colon() {
        let err = ValueParser::ReadingTable.parse("nocolon").unwrap_err();
        assert!(err.to_string().contains("nocolon"));
    }

    #[test]
    fn test_pair_table_last_duplicate_wins() {
        let value = ValueParser::PairTable.parse("가:0E 가:0X 나:1N").unwrap();
        assert_eq!(value, json!({"가": "0X", "나": "1N"}));
    }

    #[test]
    fn test_pair_table_splits_on_first_colon_only() {
        let value = ValueParser::PairTable.parse("가:0:E").unwrap();
        assert_eq!(value, json!({"가": "0:E"}));
    }

    #[test]
    fn test_registry_fallback_is_identity() {
        let registry = ParserRegistry::unihan();
        assert_eq!(
            registry.parser_for("kDefinition"),
            ValueParser::Identity
        );
    }

    #[test]
    fn test_registry_unihan_bindings() {
        let registry = ParserRegistry::unihan();
        assert_eq!(
            registry.parser_for("kTotalStrokes"),
            ValueParser::IntegerList
        );
        assert_eq!(
            registry.parser_for("kHanyuPinlu"),
            ValueParser::FrequencyTable
        );
        assert_eq!(
            registry.parser_for("kTraditionalVariant"),
            ValueParser::CodepointList
        );
        assert_eq!(registry.parser_for("kHangul"), ValueParser::PairTable);
    }

    #[test]
    fn test_registry_with_parser_override() {
        let registry = ParserRegistry::empty().with_parser("kCustom", ValueParser::Integer);
        assert_eq!(registry.parser_for("kCustom"), ValueParser::Integer);
        assert_eq!(registry.parser_for("kOther"), ValueParser::Identity);
    }
}
