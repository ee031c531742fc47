//! Word-level lexical tables: difficulty scoring, motor chunks, whole-word
//! typo patterns and commonly-confused key pairs.

use crate::keyboard;

/// Very frequent short words typed as a single learned motor unit rather
/// than character-by-character.
const MOTOR_CHUNKS: [&str; 56] = [
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her", "was", "one",
    "our", "out", "has", "his", "how", "its", "may", "new", "now", "old", "see", "way", "who",
    "did", "get", "let", "say", "she", "too", "use", "is", "it", "he", "we", "do", "no", "so",
    "up", "if", "my", "as", "at", "be", "by", "go", "in", "me", "of", "on", "or", "to", "a", "i",
];

pub fn is_motor_chunk(word: &str) -> bool {
    let lower = word.to_lowercase();
    MOTOR_CHUNKS.contains(&lower.as_str())
}

/// Score word difficulty from 0.0 (trivial) upward, capped at 2.0.
/// Considers length beyond 3 characters, letter rarity and same-finger
/// adjacent pairs.
pub fn word_difficulty(word: &str) -> f64 {
    if word.is_empty() {
        return 0.0;
    }
    let chars: Vec<char> = word.to_lowercase().chars().collect();

    let length_score = chars.len().saturating_sub(3) as f64 * 0.08;

    let rarity: f64 = chars
        .iter()
        .map(|&c| (5.0 - keyboard::letter_frequency(c)).max(0.0) * 0.02)
        .sum();

    let bigram_score: f64 = chars
        .windows(2)
        .filter(|w| keyboard::is_same_finger_pair(w[0], w[1]))
        .count() as f64
        * 0.08;

    (length_score + rarity + bigram_score).min(2.0)
}

/// Keys habitually confused for one another (visual or motor confusion).
pub fn confusion_of(c: char) -> Option<char> {
    Some(match c.to_ascii_lowercase() {
        'b' => 'v',
        'v' => 'b',
        'n' => 'm',
        'm' => 'n',
        'd' => 'f',
        'f' => 'd',
        'g' => 'h',
        'h' => 'g',
        'i' => 'o',
        'o' => 'i',
        'e' => 'r',
        'r' => 'e',
        'c' => 'x',
        'x' => 'c',
        _ => return None,
    })
}

/// Known misspellings of common words, used for whole-word substitution
/// errors. Lookup key must already be lowercased.
pub fn common_typos(word: &str) -> Option<&'static [&'static str]> {
    COMMON_TYPOS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, typos)| *typos)
}

const COMMON_TYPOS: &[(&str, &[&str])] = &[
    ("the", &["teh", "hte", "th", "tje", "tue"]),
    ("and", &["adn", "nad", "anf", "ans"]),
    ("that", &["taht", "htat", "tath", "thta"]),
    ("have", &["ahve", "hvae", "hav", "haev"]),
    ("with", &["wiht", "wtih", "wth", "iwth"]),
    ("this", &["tihs", "thsi", "htis", "tis"]),
    ("from", &["form", "fomr", "fro", "rfom"]),
    ("they", &["tehy", "thye", "htey", "tey"]),
    ("been", &["eben", "bene", "ben", "beem"]),
    ("their", &["thier", "tehir", "theri", "ther"]),
    ("which", &["whcih", "whihc", "wich", "wihch"]),
    ("would", &["woudl", "wuold", "woud", "owuld"]),
    ("there", &["tehre", "htere", "ther", "theer"]),
    ("about", &["abotu", "abuot", "abut", "baout"]),
    ("just", &["jsut", "juts", "jusr"]),
    ("like", &["liek", "likr", "lik", "lkie"]),
    ("what", &["waht", "wath", "whta", "wat"]),
    ("when", &["wehn", "whn", "whne", "hwen"]),
    ("your", &["yuor", "yoru", "yor", "yoir"]),
    ("some", &["soem", "smoe", "soe", "osme"]),
    ("them", &["tehm", "thme", "tem", "htem"]),
    ("than", &["tahn", "htan", "thn"]),
    ("other", &["ohter", "otehr", "oter", "toher"]),
    ("time", &["tiem", "tmie", "itme", "tim"]),
    ("very", &["vrey", "vey", "ver", "evry"]),
    ("also", &["aslo", "laso", "als", "aldo"]),
    ("make", &["maek", "mkae", "amke", "mak"]),
    ("know", &["knwo", "konw", "kno", "nkow"]),
    ("people", &["peopel", "poeple", "peolpe", "peopl"]),
    ("because", &["becasue", "becuase", "becaus", "beacuse"]),
    ("could", &["cuold", "coudl", "coud", "colud"]),
    ("should", &["shoudl", "shuold", "shoud", "sholud"]),
    ("think", &["thnik", "thnk", "htink", "thiink"]),
    ("after", &["aftre", "atfer", "afer", "aftr"]),
    ("work", &["wokr", "wrk", "owrk", "wrok"]),
    ("first", &["frist", "fisrt", "firt", "firsr"]),
    ("well", &["wlel", "wel", "weel", "wll"]),
    ("even", &["eevn", "evne", "ven"]),
    ("good", &["godo", "god", "goood", "ogod"]),
    ("much", &["mcuh", "muhc", "mch", "umch"]),
    ("where", &["wehre", "wheer", "wher", "hwere"]),
    ("right", &["rihgt", "rigth", "rgiht", "riight"]),
    ("still", &["sitll", "stil", "stll", "tsill"]),
    ("between", &["bewteen", "betwen", "betwene", "bteween"]),
    ("before", &["beofre", "befroe", "befor", "bfore"]),
    ("through", &["thorugh", "throught", "throuhg", "trhough"]),
    ("great", &["gerat", "graet", "gret", "grear"]),
    ("being", &["bieng", "beng", "beign", "beig"]),
    ("world", &["wrold", "wolrd", "worl", "wrld"]),
    ("these", &["thees", "tehse", "thse", "htese"]),
    ("those", &["thoes", "htose", "thoese", "thsoe"]),
    ("does", &["dose", "deos", "doe", "odes"]),
    ("going", &["giong", "goign", "gong", "goig"]),
    ("take", &["taek", "tkae", "tka", "atke"]),
    ("want", &["wnat", "watn", "wnt", "awnt"]),
    ("same", &["saem", "smae", "sam", "asme"]),
    ("each", &["eahc", "aech", "ech"]),
    ("come", &["coem", "cmoe", "com", "ocme"]),
    ("many", &["mnay", "mny", "amny", "mayn"]),
    ("then", &["tehn", "thn", "thne", "hten"]),
    ("only", &["olny", "onyl", "noly", "onl"]),
    ("over", &["oevr", "voer", "ovr", "ovre"]),
    ("more", &["moer", "mroe", "mor", "omre"]),
    ("such", &["scuh", "shcu", "suhc", "uscb"]),
    ("into", &["itno", "inot", "nito", "ino"]),
    ("year", &["yaer", "yer", "yera", "eyar"]),
    ("most", &["msot", "mos", "omst", "mots"]),
    ("find", &["fnd", "fidn", "fnid", "ifnd"]),
    ("here", &["heer", "hre", "ehre", "herr"]),
    ("thing", &["thign", "thnig", "ting", "htign"]),
    ("long", &["lnog", "logn", "lon", "olng"]),
    ("look", &["loko", "lok", "loook", "olok"]),
    ("down", &["dwon", "donw", "don", "odwn"]),
    ("life", &["lief", "lfie", "lif", "ilfe"]),
    ("never", &["nver", "neevr", "nevr", "enver"]),
    ("need", &["nede", "ned", "nee", "ened"]),
    ("will", &["wll", "iwll", "wil", "wlil"]),
    ("home", &["hmoe", "hom", "hoem", "ohme"]),
    ("back", &["bakc", "bck", "abck", "bcak"]),
    ("give", &["gvie", "giev", "giv", "igve"]),
    ("help", &["hlep", "hep", "ehlp", "hepl"]),
    ("hand", &["hnad", "hnd", "ahnd", "hadn"]),
    ("high", &["hgih", "hih", "ihgh", "hig"]),
    ("keep", &["kepe", "kep", "keeep", "ekep"]),
    ("last", &["lsat", "las", "alst", "lasr"]),
    ("name", &["naem", "nmae", "nam", "anme"]),
    ("play", &["paly", "ply", "pla", "lpay"]),
    ("small", &["smlal", "smal", "smll", "samll"]),
    ("every", &["eevry", "evrey", "evry", "evey"]),
    ("again", &["agian", "agin", "aagin", "gaain"]),
    ("change", &["chnage", "chagne", "chang", "cahnge"]),
    ("point", &["piont", "ponit", "pint", "poin"]),
    ("place", &["palce", "plcae", "plac"]),
    ("under", &["uner", "udner", "undr", "nuder"]),
    ("while", &["whiel", "whlie", "whil", "hwile"]),
];
