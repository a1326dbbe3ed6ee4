//! Encoding detection and normalization to UTF-8.
//!
//! Novel files arrive in whatever encoding their author's editor used: GBK
//! and Big5 are as common as UTF-8. [`normalize`] picks an encoding from the
//! bytes themselves and always hands back UTF-8 text, so nothing downstream
//! needs to care.

use std::fmt;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::{debug, warn};

/// Detections below this confidence fall back to lossy UTF-8.
pub const LOW_CONFIDENCE: f32 = 0.5;

/// Canonical encodings recognized by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Ascii,
    Utf8,
    Utf16Le,
    Utf16Be,
    Gbk,
    Gb18030,
    Big5,
    ShiftJis,
    EucJp,
    Iso8859_1,
    Windows1252,
}

impl TextEncoding {
    /// Canonical lowercase name (`"utf8"`, `"gbk"`, `"shift_jis"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Ascii => "ascii",
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Utf16Le => "utf16le",
            TextEncoding::Utf16Be => "utf16be",
            TextEncoding::Gbk => "gbk",
            TextEncoding::Gb18030 => "gb18030",
            TextEncoding::Big5 => "big5",
            TextEncoding::ShiftJis => "shift_jis",
            TextEncoding::EucJp => "euc-jp",
            TextEncoding::Iso8859_1 => "iso-8859-1",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Map a detector or vendor label onto the canonical set.
    ///
    /// Matching is case-insensitive. Returns `None` for labels outside the
    /// set; callers default those to UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// use fishreader::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::from_label("GB2312"), Some(TextEncoding::Gbk));
    /// assert_eq!(TextEncoding::from_label("UTF-8"), Some(TextEncoding::Utf8));
    /// assert_eq!(TextEncoding::from_label("koi8-r"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let encoding = match label.trim().to_ascii_lowercase().as_str() {
            "ascii" | "us-ascii" => TextEncoding::Ascii,
            "utf8" | "utf-8" => TextEncoding::Utf8,
            "utf16le" | "utf-16le" => TextEncoding::Utf16Le,
            "utf16be" | "utf-16be" => TextEncoding::Utf16Be,
            "gb2312" | "gbk" | "x-gbk" | "cp936" => TextEncoding::Gbk,
            "gb18030" => TextEncoding::Gb18030,
            "big5" | "big5-hkscs" => TextEncoding::Big5,
            "shift_jis" | "shift-jis" | "sjis" | "windows-31j" => TextEncoding::ShiftJis,
            "euc-jp" | "eucjp" => TextEncoding::EucJp,
            "iso-8859-1" | "latin1" => TextEncoding::Iso8859_1,
            "windows-1252" | "cp1252" => TextEncoding::Windows1252,
            _ => return None,
        };
        Some(encoding)
    }

    /// The `encoding_rs` decoder for this encoding.
    ///
    /// ASCII decodes as UTF-8 and ISO-8859-1 as its Windows-1252 superset,
    /// matching the WHATWG encoding standard.
    fn decoder(self) -> &'static Encoding {
        match self {
            TextEncoding::Ascii | TextEncoding::Utf8 => encoding_rs::UTF_8,
            TextEncoding::Utf16Le => encoding_rs::UTF_16LE,
            TextEncoding::Utf16Be => encoding_rs::UTF_16BE,
            TextEncoding::Gbk => encoding_rs::GBK,
            TextEncoding::Gb18030 => encoding_rs::GB18030,
            TextEncoding::Big5 => encoding_rs::BIG5,
            TextEncoding::ShiftJis => encoding_rs::SHIFT_JIS,
            TextEncoding::EucJp => encoding_rs::EUC_JP,
            TextEncoding::Iso8859_1 | TextEncoding::Windows1252 => encoding_rs::WINDOWS_1252,
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of [`normalize`]: UTF-8 text plus what the detector decided.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub text: String,
    pub encoding: TextEncoding,
    /// Share of decoded characters that were not replacement characters, in `0.0..=1.0`.
    pub confidence: f32,
}

/// Detect the encoding of `raw` and decode it to UTF-8.
///
/// Detection order:
/// 1. A byte-order mark (UTF-8, UTF-16LE, UTF-16BE) wins outright
/// 2. Pure ASCII and valid UTF-8 are reported as such
/// 3. Otherwise a statistical detector guesses among legacy encodings
///
/// This never fails. A guess that decodes with too many replacement
/// characters is abandoned in favor of lossy UTF-8.
///
/// # Examples
///
/// ```
/// use fishreader::{TextEncoding, normalize};
///
/// let normalized = normalize("第1章 开始".as_bytes());
/// assert_eq!(normalized.text, "第1章 开始");
/// assert_eq!(normalized.encoding, TextEncoding::Utf8);
/// ```
pub fn normalize(raw: &[u8]) -> Normalized {
    if let Some((encoding, bom_len)) = Encoding::for_bom(raw) {
        let label = TextEncoding::from_label(encoding.name()).unwrap_or(TextEncoding::Utf8);
        let (text, confidence) = decode_as(label, &raw[bom_len..]);
        return Normalized {
            text,
            encoding: label,
            confidence,
        };
    }

    if raw.is_ascii() {
        return Normalized {
            text: String::from_utf8_lossy(raw).into_owned(),
            encoding: TextEncoding::Ascii,
            confidence: 1.0,
        };
    }

    if let Ok(text) = std::str::from_utf8(raw) {
        return Normalized {
            text: text.to_owned(),
            encoding: TextEncoding::Utf8,
            confidence: 1.0,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(raw, true);
    let guessed = detector.guess(None, false);
    let label = TextEncoding::from_label(guessed.name()).unwrap_or_else(|| {
        debug!("unrecognized encoding label {}, assuming utf8", guessed.name());
        TextEncoding::Utf8
    });

    decode_guess(label, raw)
}

/// Decode with a detected encoding. A result below [`LOW_CONFIDENCE`] is
/// replaced by lossy UTF-8 and reported as `utf8`.
fn decode_guess(label: TextEncoding, raw: &[u8]) -> Normalized {
    let (text, confidence) = decode_as(label, raw);
    if confidence >= LOW_CONFIDENCE {
        return Normalized {
            text,
            encoding: label,
            confidence,
        };
    }

    warn!(
        "low confidence ({confidence:.2}) decoding as {label}, falling back to lossy utf8"
    );
    if label == TextEncoding::Utf8 {
        return Normalized {
            text,
            encoding: label,
            confidence,
        };
    }
    let (text, confidence) = decode_as(TextEncoding::Utf8, raw);
    Normalized {
        text,
        encoding: TextEncoding::Utf8,
        confidence,
    }
}

/// Decode without BOM sniffing and score the result.
fn decode_as(encoding: TextEncoding, bytes: &[u8]) -> (String, f32) {
    let (text, _had_errors) = encoding.decoder().decode_without_bom_handling(bytes);
    let confidence = clean_ratio(&text);
    (text.into_owned(), confidence)
}

/// Fraction of characters in `text` that are not U+FFFD.
fn clean_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut replaced = 0usize;
    for c in text.chars() {
        total += 1;
        if c == char::REPLACEMENT_CHARACTER {
            replaced += 1;
        }
    }
    if total == 0 {
        return 1.0;
    }
    1.0 - replaced as f32 / total as f32
}
