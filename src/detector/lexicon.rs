// WHY: Single immutable home for every pattern the engine matches against
// Built once per process and shared by reference into every extraction call

use anyhow::Result;
use regex_automata::meta::Regex;
use std::ops::Range;
use std::sync::OnceLock;
use tracing::debug;

/// Placeholder standing in for a removed quotation span (U+2026)
pub const QUOTE_PLACEHOLDER: char = '\u{2026}';

// Cantonese markers: characters, particles and colloquial words absent from SWC
const CANTONESE_CHARACTERS: &str = "[嘅嗰啲咗佢喺咁噉冇哋畀嚟諗惗乜嘢閪撚𨳍𨳊瞓睇餸𨋢摷嚿嚡嘥嗮啱揾搵揦喐逳噏𢳂岋糴揈捹撳㩒𥄫攰癐冚孻冧𡃁嚫跣𨃩瀡氹嬲掟揼揸孭黐唞㪗埞忟𢛴踎脷]";
const CANTONESE_PARTICLES: &str = "[㗎𠺢喎噃啩𠿪啫唧嗱]";
const CANTONESE_COMPOUNDS: &[&str] = &[
    "唔[係得會想好識使洗駛通知到去走掂該錯差多少]",
    "點[樣會做得解知]",
    "[琴尋噚聽第]日",
    "[而依]家",
    "[真就實梗緊堅又話都但淨剩只定一]係",
    "邊[度個位科]",
    "[嚇凍攝整揩逢淥浸激][親嚫]",
    "[橫搞傾得唔好]掂",
    "仲[有係話要得好衰唔]",
    "返[學工去翻番到]",
    "[好得]返",
    "執[好生實返輸]",
    "[癡痴][埋線住起身]",
    "[同帶做整溝炒煮]埋",
    "[剩淨坐留]低",
    "傾[偈計]",
];
const CANTONESE_WORDS: &[&str] = &[
    "屋企", "收皮", "慳錢", "屈機", "隔籬", "幫襯", "求其", "家陣", "仆街",
    "是[但旦]", "[濕溼]碎", "零舍", "肉[赤緊酸]", "核突", "[勁隻][秋抽]",
    "[呃𧦠][鬼人秤稱錢]",
];

// Common SWC words that happen to contain a Cantonese marker
const CANTONESE_EXCLUSIONS: &[&str] = &["關係", "吱唔", "咿唔", "喇嘛", "喇叭", "俾路支", "俾斯麥"];

// SWC markers: function words far less common in written Cantonese
const SWC_CHARACTERS: &str = "[這哪唄咱啥甭那是的他她它吧沒麼么些了卻説說吃弄把也在]";
const SWC_WORDS: &[&str] = &["[事門塊勁花那點會]兒", "而已"];

// Proper nouns and set phrases where an SWC marker also appears in Cantonese
// 的起心肝 / 些[..] and 弄[堂] / 把[..] are separate alternatives, so 些微 and 把握 are excluded on their own
const SWC_EXCLUSIONS: &[&str] = &[
    "亞利桑那", "剎那", "巴塞羅那", "薩那", "沙那", "哈瓦那", "印第安那", "那不勒斯", "支那",
    "是[否日次非但旦]", "[利於]是", "唯命是從", "頭頭是道", "似是而非", "自以為是",
    "俯拾皆是", "撩是鬥非", "莫衷一是", "唯才是用",
    "[目綠藍紅中]的", "的[士確式]", "波羅的海", "眾矢之的", "的而且確", "大眼的度", "的起心肝",
    "些[微少許小]",
    "[淹沉浸覆湮埋沒出]沒", "沒[落頂收]", "神出鬼沒",
    "了[結無斷當然哥結得解事之]", "[未明]了", "不得了", "大不了",
    "他[信人國日殺鄉]", "[其利無排維結]他", "馬耳他", "他加祿", "他山之石",
    "其[它]",
    "[酒網水貼]吧", "吧[台臺枱檯]",
    "[退忘阻]卻", "卻步",
    "[遊游小傳解學假淺眾衆訴論][説說]", "[說説][話服明]", "自圓其[説說]", "長話短[說説]", "不由分[說説]",
    "吃[虧苦力]",
    "弄[堂]",
    "把[握柄持火風關鬼口嘴戲脈炮砲屁手聲]", "大把", "拉把", "冧把", "掃把", "拖把", "得把", "加把",
    "下把位", "一把年紀", "把死人聲", "自把自為", "兩把", "三把", "四把", "五把", "幾把", "拎把",
    "第一把", "泵把",
    "也[許門]", "[非威]也", "也文也武", "之乎者也", "維也納", "空空如也", "頭也不回", "時也[命運]也",
    "在[場乎下校學行任野意於望內案旁生世心線逃位即職座囚此家]",
    "[站志旨爭所勝衰實內外念現好健存潛差弊活]在", "我思故我在",
];

// CJK blocks counted towards segment length, each optionally followed by a variation selector
const HAN_IDEOGRAPH: &str = r"[\u{4e00}-\u{9fff}\u{3400}-\u{4dbf}\u{20000}-\u{2a6df}\u{2a700}-\u{2ebef}\u{30000}-\u{323af}\u{fa0e}\u{fa0f}\u{fa11}\u{fa13}\u{fa14}\u{fa1f}\u{fa21}\u{fa23}\u{fa24}\u{fa27}\u{fa28}\u{fa29}\u{3006}\u{3007}]";
const VARIATION_SELECTOR: &str = r"[\u{fe00}-\u{fe0f}\u{e0100}-\u{e01ef}]";

/// Opening and closing marks of every recognised quotation style
pub const QUOTATION_STYLES: &[(char, char)] = &[
    ('「', '」'),
    ('\u{201C}', '\u{201D}'),
    ('《', '》'),
    ('【', '】'),
    ('『', '』'),
];

const DELIMITERS: &str = r"[，。；？！⋯\n]";

/// Which language variety a marker pattern is evidence for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variety {
    Cantonese,
    Swc,
}

/// Compiled pattern set shared by every judgement
#[derive(Debug, Clone)]
pub struct Lexicon {
    cantonese_marker: Regex,
    cantonese_exclusion: Regex,
    swc_marker: Regex,
    swc_exclusion: Regex,
    han_character: Regex,
    quotation_pair: Regex,
    delimiter: Regex,
}

static SHARED_LEXICON: OnceLock<Lexicon> = OnceLock::new();

impl Lexicon {
    /// Compile the built-in lexicon
    pub fn new() -> Result<Self> {
        // Compositional pattern components
        let cantonese_marker = alternation(
            [CANTONESE_CHARACTERS, CANTONESE_PARTICLES]
                .into_iter()
                .chain(CANTONESE_COMPOUNDS.iter().copied())
                .chain(CANTONESE_WORDS.iter().copied()),
        );
        let cantonese_exclusion = alternation(CANTONESE_EXCLUSIONS.iter().copied());
        let swc_marker = alternation(std::iter::once(SWC_CHARACTERS).chain(SWC_WORDS.iter().copied()));
        let swc_exclusion = alternation(SWC_EXCLUSIONS.iter().copied());
        let han_character = format!("{HAN_IDEOGRAPH}{VARIATION_SELECTOR}?");

        // WHY: excluding both marks of a style from the interior makes a pair end at its first closer
        let quotation_pair = alternation(QUOTATION_STYLES.iter().map(|(open, close)| {
            format!("{open}[^{open}{close}]*{close}")
        }));

        debug!("Compiling lexicon patterns");

        Ok(Self {
            cantonese_marker: Regex::new(&cantonese_marker)?,
            cantonese_exclusion: Regex::new(&cantonese_exclusion)?,
            swc_marker: Regex::new(&swc_marker)?,
            swc_exclusion: Regex::new(&swc_exclusion)?,
            han_character: Regex::new(&han_character)?,
            quotation_pair: Regex::new(&quotation_pair)?,
            delimiter: Regex::new(DELIMITERS)?,
        })
    }

    /// Process-wide lexicon, compiled on first use
    pub fn shared() -> Result<&'static Lexicon> {
        if let Some(lexicon) = SHARED_LEXICON.get() {
            return Ok(lexicon);
        }
        let lexicon = Lexicon::new()?;
        Ok(SHARED_LEXICON.get_or_init(|| lexicon))
    }

    /// Byte ranges of every marker match for one variety, leftmost-first and non-overlapping
    pub fn marker_spans(&self, variety: Variety, text: &str) -> Vec<Range<usize>> {
        let pattern = match variety {
            Variety::Cantonese => &self.cantonese_marker,
            Variety::Swc => &self.swc_marker,
        };
        spans(pattern, text)
    }

    /// Byte ranges of every exclusion match for one variety
    pub fn exclusion_spans(&self, variety: Variety, text: &str) -> Vec<Range<usize>> {
        let pattern = match variety {
            Variety::Cantonese => &self.cantonese_exclusion,
            Variety::Swc => &self.swc_exclusion,
        };
        spans(pattern, text)
    }

    /// Number of Han characters; punctuation and non-Han script do not count
    pub fn han_length(&self, text: &str) -> usize {
        self.han_character.find_iter(text).count()
    }

    /// Byte ranges of balanced quotation pairs, delimiters included
    pub fn quotation_spans(&self, text: &str) -> Vec<Range<usize>> {
        spans(&self.quotation_pair, text)
    }

    /// Byte ranges of sentence delimiters
    pub fn delimiter_spans(&self, text: &str) -> Vec<Range<usize>> {
        spans(&self.delimiter, text)
    }
}

fn alternation<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .map(|part| format!("(?:{})", part.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

fn spans(pattern: &Regex, text: &str) -> Vec<Range<usize>> {
    pattern.find_iter(text).map(|mat| mat.range()).collect()
}
