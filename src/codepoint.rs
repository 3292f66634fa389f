//! 코드포인트 디코딩 모듈
//!
//! "U+XXXX" 표기를 유니코드 문자로 변환합니다.

use crate::error::{Result, UConvertError};

/// 단일 코드포인트 표기를 문자로 디코딩
///
/// 접두사는 정확히 `U+`, 16진수 자릿수는 대소문자를 구분하지 않습니다.
/// 유니코드 스칼라 값 범위를 벗어나는 서수(서러게이트 포함)는 에러입니다.
///
/// # Examples
/// ```
/// use uconvert::codepoint::decode_one;
///
/// assert_eq!(decode_one("U+0041").unwrap(), 'A');
/// assert_eq!(decode_one("U+4e00").unwrap(), '一');
/// assert!(decode_one("0041").is_err());
/// ```
pub fn decode_one(token: &str) -> Result<char> {
    let malformed = || UConvertError::MalformedCodepoint {
        token: token.to_string(),
    };

    let hex = token
        .strip_prefix("U+")
        .filter(|h| !h.is_empty() && h.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(malformed)?;

    let ordinal = u32::from_str_radix(hex, 16).map_err(|_| malformed())?;
    char::from_u32(ordinal).ok_or_else(malformed)
}

/// 공백으로 구분된 코드포인트 표기 목록을 문자 목록으로 디코딩
///
/// 순서와 중복이 그대로 유지됩니다. 토큰 하나라도 잘못되면
/// 입력 전체를 담은 에러를 반환합니다.
///
/// # Examples
/// ```
/// use uconvert::codepoint::decode_many;
///
/// assert_eq!(decode_many("U+0041 U+0042").unwrap(), vec!['A', 'B']);
/// ```
pub fn decode_many(text: &str) -> Result<Vec<char>> {
    text.split_whitespace()
        .map(decode_one)
        .collect::<Result<Vec<_>>>()
        .map_err(|_| UConvertError::MalformedCodepointList {
            text: text.to_string(),
        })
}
