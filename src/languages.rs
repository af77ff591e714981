use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Built-in language code → display name table.
const BUILTIN_NAMES: &[(&str, &str)] = &[
    ("af-ZA", "Afrikaans (South Africa)"),
    ("am-ET", "Amharic"),
    ("ar-AE", "Arabic (United Arab Emirates)"),
    ("ar-BH", "Arabic (Bahrain)"),
    ("ar-DZ", "Arabic (Algeria)"),
    ("ar-EG", "Arabic (Egypt)"),
    ("ar-IQ", "Arabic (Iraq)"),
    ("ar-JO", "Arabic (Jordan)"),
    ("ar-KW", "Arabic (Kuwait)"),
    ("ar-LB", "Arabic (Lebanon)"),
    ("ar-LY", "Arabic (Libya)"),
    ("ar-MA", "Arabic (Morocco)"),
    ("ar-OM", "Arabic (Oman)"),
    ("ar-QA", "Arabic (Qatar)"),
    ("ar-SA", "Arabic (Saudi Arabia)"),
    ("ar-SY", "Arabic (Syria)"),
    ("ar-TN", "Arabic (Tunisia)"),
    ("ar-XA", "Arabic (Gulf)"),
    ("ar-YE", "Arabic (Yemen)"),
    ("as-IN", "Assamese (India)"),
    ("az-AZ", "Azerbaijani (Azerbaijan)"),
    ("bg-BG", "Bulgarian"),
    ("bn-BD", "Bengali (Bangladesh)"),
    ("bn-IN", "Bengali (India)"),
    ("bs-BA", "Bosnian"),
    ("ca-ES", "Catalan"),
    ("cmn-CN", "Mandarin Chinese"),
    ("cmn-TW", "Mandarin Chinese (Taiwan)"),
    ("cs-CZ", "Czech"),
    ("cy-GB", "Welsh"),
    ("da-DK", "Danish"),
    ("de-AT", "German (Austria)"),
    ("de-CH", "German (Switzerland)"),
    ("de-DE", "German (Germany)"),
    ("el-GR", "Greek"),
    ("en-AU", "English (Australia)"),
    ("en-CA", "English (Canada)"),
    ("en-GB", "English (United Kingdom)"),
    ("en-GB-WLS", "English (United Kingdom — Wales)"),
    ("en-HK", "English (Hong Kong SAR China)"),
    ("en-IE", "English (Ireland)"),
    ("en-IN", "English (India)"),
    ("en-KE", "English (Kenya)"),
    ("en-NG", "English (Nigeria)"),
    ("en-NZ", "English (New Zealand)"),
    ("en-PH", "English (Philippines)"),
    ("en-SG", "English (Singapore)"),
    ("en-TZ", "English (Tanzania)"),
    ("en-US", "English (United States)"),
    ("en-ZA", "English (South Africa)"),
    ("es-AR", "Spanish (Argentina)"),
    ("es-BO", "Spanish (Bolivia)"),
    ("es-CL", "Spanish (Chile)"),
    ("es-CO", "Spanish (Colombia)"),
    ("es-CR", "Spanish (Costa Rica)"),
    ("es-CU", "Spanish (Cuba)"),
    ("es-DO", "Spanish (Dominican Republic)"),
    ("es-EC", "Spanish (Ecuador)"),
    ("es-ES", "Spanish (Spain)"),
    ("es-GQ", "Spanish (Equatorial Guinea)"),
    ("es-GT", "Spanish (Guatemala)"),
    ("es-HN", "Spanish (Honduras)"),
    ("es-MX", "Spanish (Mexico)"),
    ("es-NI", "Spanish (Nicaragua)"),
    ("es-PA", "Spanish (Panama)"),
    ("es-PE", "Spanish (Peru)"),
    ("es-PR", "Spanish (Puerto Rico)"),
    ("es-PY", "Spanish (Paraguay)"),
    ("es-SV", "Spanish (El Salvador)"),
    ("es-US", "Spanish (United States)"),
    ("es-UY", "Spanish (Uruguay)"),
    ("es-VE", "Spanish (Venezuela)"),
    ("et-EE", "Estonian"),
    ("eu-ES", "Basque (Spain)"),
    ("fa-IR", "Persian"),
    ("fi-FI", "Finnish"),
    ("fil-PH", "Filipino (Philippines)"),
    ("fr-BE", "French (Belgium)"),
    ("fr-CA", "French (Canada)"),
    ("fr-CH", "French (Switzerland)"),
    ("fr-FR", "French (France)"),
    ("ga-IE", "Irish"),
    ("gl-ES", "Galician (Spain)"),
    ("gu-IN", "Gujarati"),
    ("he-IL", "Hebrew"),
    ("hi-IN", "Hindi"),
    ("hr-HR", "Croatian"),
    ("hu-HU", "Hungarian"),
    ("hy-AM", "Armenian"),
    ("id-ID", "Indonesian"),
    ("is-IS", "Icelandic"),
    ("it-IT", "Italian"),
    ("iu-Cans-CA", "Inuktitut (Syllabics, Canada)"),
    ("iu-Latn-CA", "Inuktitut (Latin, Canada)"),
    ("ja-JP", "Japanese"),
    ("jv-ID", "Javanese (Indonesia)"),
    ("ka-GE", "Georgian"),
    ("kk-KZ", "Kazakh"),
    ("km-KH", "Khmer (Cambodia)"),
    ("kn-IN", "Kannada"),
    ("ko-KR", "Korean"),
    ("lo-LA", "Lao (Laos)"),
    ("lt-LT", "Lithuanian"),
    ("lv-LV", "Latvian"),
    ("mk-MK", "Macedonian"),
    ("ml-IN", "Malayalam"),
    ("mn-MN", "Mongolian"),
    ("mr-IN", "Marathi"),
    ("ms-MY", "Malay"),
    ("mt-MT", "Maltese (Malta)"),
    ("my-MM", "Burmese"),
    ("nb-NO", "Norwegian"),
    ("ne-NP", "Nepali (Nepal)"),
    ("nl-BE", "Dutch (Belgium)"),
    ("nl-NL", "Dutch (Netherlands)"),
    ("or-IN", "Odia (India)"),
    ("pa-IN", "Punjabi"),
    ("pl-PL", "Polish"),
    ("ps-AF", "Pashto (Afghanistan)"),
    ("pt-BR", "Portuguese"),
    ("pt-PT", "Portuguese (Portugal)"),
    ("ro-RO", "Romanian"),
    ("ru-RU", "Russian"),
    ("si-LK", "Sinhala (Sri Lanka)"),
    ("sk-SK", "Slovak"),
    ("sl-SI", "Slovenian"),
    ("so-SO", "Somali"),
    ("sq-AL", "Albanian"),
    ("sr-Latn-RS", "Serbian"),
    ("sr-RS", "Serbian (Serbia)"),
    ("su-ID", "Sundanese (Indonesia)"),
    ("sv-SE", "Swedish"),
    ("sw-KE", "Swahili (Kenya)"),
    ("sw-TZ", "Swahili (Tanzania)"),
    ("ta-IN", "Tamil (India)"),
    ("ta-LK", "Tamil (Sri Lanka)"),
    ("ta-MY", "Tamil (Malaysia)"),
    ("ta-SG", "Tamil (Singapore)"),
    ("te-IN", "Telugu"),
    ("th-TH", "Thai"),
    ("tr-TR", "Turkish"),
    ("uk-UA", "Ukrainian"),
    ("ur-IN", "Urdu (India)"),
    ("ur-PK", "Urdu (Pakistan)"),
    ("uz-UZ", "Uzbek (Uzbekistan)"),
    ("vi-VN", "Vietnamese"),
    ("wuu-CN", "Wu Chinese (China)"),
    ("yue-CN", "Cantonese (China)"),
    ("yue-HK", "Cantonese (Hong Kong)"),
    ("zh-CN", "Chinese (China)"),
    ("zh-CN-guangxi", "Chinese (Guangxi, China)"),
    ("zh-CN-henan", "Chinese (Henan, China)"),
    ("zh-CN-liaoning", "Chinese (Liaoning, China)"),
    ("zh-CN-shaanxi", "Chinese (Shaanxi, China)"),
    ("zh-CN-shandong", "Chinese (Shandong, China)"),
    ("zh-CN-sichuan", "Chinese (Sichuan, China)"),
    ("zh-HK", "Chinese (Hong Kong SAR China)"),
    ("zh-TW", "Chinese (Taiwan)"),
    ("zu-ZA", "Zulu (South Africa)"),
];

/// Chinese regional variants: `zh-CN-<region>`, e.g. `zh-CN-henan`.
static CHINESE_REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^zh-cn-(.+)$").unwrap()
});

/// Code → display name lookup: the built-in table with config overrides merged on top.
#[derive(Debug, Clone)]
pub struct LanguageNames {
    names: HashMap<String, String>,
}

impl Default for LanguageNames {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}

impl LanguageNames {
    pub fn new(custom: &HashMap<String, String>) -> Self {
        let mut names: HashMap<String, String> = BUILTIN_NAMES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        for (code, name) in custom {
            names.insert(code.trim().to_string(), name.clone());
        }
        Self { names }
    }

    /// Human-readable name for a language code. Never fails: unmapped codes come back as-is.
    pub fn display_name(&self, code: &str) -> String {
        let code = code.trim();
        if let Some(name) = self.names.get(code) {
            return name.clone();
        }
        if let Some(caps) = CHINESE_REGION_RE.captures(code) {
            let region = title_case(&caps[1].replace('_', " "));
            return format!("Chinese ({}, China)", region);
        }
        if code.is_empty() {
            "unknown".to_string()
        } else {
            code.to_string()
        }
    }
}

/// Uppercase the first letter of each alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
