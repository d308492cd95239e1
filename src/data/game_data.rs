//! Static game tables: the prize ladder and the built-in fallback questions.

use crate::models::{PrizeLadderEntry, Question};

/// Highest level on the ladder.
pub const MAX_LEVEL: u8 = 15;

/// Prize text shown before anything has been won.
pub const ZERO_PRIZE: &str = "₹0";

pub const PRIZE_LADDER: [PrizeLadderEntry; MAX_LEVEL as usize] = [
    PrizeLadderEntry::new(1, "₹1,000", false),
    PrizeLadderEntry::new(2, "₹2,000", false),
    PrizeLadderEntry::new(3, "₹3,000", false),
    PrizeLadderEntry::new(4, "₹5,000", true),
    PrizeLadderEntry::new(5, "₹10,000", false),
    PrizeLadderEntry::new(6, "₹20,000", false),
    PrizeLadderEntry::new(7, "₹40,000", true),
    PrizeLadderEntry::new(8, "₹80,000", false),
    PrizeLadderEntry::new(9, "₹1,60,000", false),
    PrizeLadderEntry::new(10, "₹3,20,000", true),
    PrizeLadderEntry::new(11, "₹6,40,000", false),
    PrizeLadderEntry::new(12, "₹12,50,000", true),
    PrizeLadderEntry::new(13, "₹25,00,000", false),
    PrizeLadderEntry::new(14, "₹1 Crore", true),
    PrizeLadderEntry::new(15, "₹7 Crores", true),
];

/// Prize for answering `level` correctly, or `₹0` outside the ladder.
pub fn prize_for(level: u8) -> &'static str {
    level
        .checked_sub(1)
        .and_then(|index| PRIZE_LADDER.get(index as usize))
        .map_or(ZERO_PRIZE, |entry| entry.amount)
}

/// Prize kept after missing `level`: the previous level's amount.
///
/// Milestones are not used as safety nets here.
pub fn prize_after_miss(level: u8) -> &'static str {
    prize_for(level.saturating_sub(1))
}

pub fn top_prize() -> &'static str {
    PRIZE_LADDER[PRIZE_LADDER.len() - 1].amount
}

type RawQuestion = (&'static str, [&'static str; 4], usize);

const FALLBACK_QUESTIONS: [RawQuestion; 15] = [
    (
        "कौन सा ग्रह लाल ग्रह के नाम से जाना जाता है?",
        ["शुक्र", "मंगल", "बृहस्पति", "शनि"],
        1,
    ),
    (
        "फ्रांस की राजधानी कौन सी है?",
        ["लंदन", "बर्लिन", "पेरिस", "मैड्रिड"],
        2,
    ),
    (
        "\"रोमियो और जूलियट\" नाटक किसने लिखा था?",
        ["चार्ल्स डिकेंस", "विलियम शेक्सपियर", "जेन ऑस्टेन", "मार्क ट्वेन"],
        1,
    ),
    ("सोने का रासायनिक प्रतीक क्या है?", ["Go", "Gd", "Au", "Ag"], 2),
    (
        "कौन सा महासागर सबसे बड़ा है?",
        ["अटलांटिक महासागर", "हिंद महासागर", "आर्कटिक महासागर", "प्रशांत महासागर"],
        3,
    ),
    (
        "द्वितीय विश्व युद्ध किस वर्ष में समाप्त हुआ?",
        ["1943", "1944", "1945", "1946"],
        2,
    ),
    ("सबसे छोटी अभाज्य संख्या कौन सी है?", ["0", "1", "2", "3"], 2),
    (
        "पौधे वायुमंडल से कौन सी गैस अवशोषित करते हैं?",
        ["ऑक्सीजन", "नाइट्रोजन", "कार्बन डाइऑक्साइड", "हाइड्रोजन"],
        2,
    ),
    (
        "मोना लिसा की पेंटिंग किसने बनाई थी?",
        ["विंसेंट वैन गॉग", "पाब्लो पिकासो", "लियोनार्डो दा विंची", "माइकलएंजेलो"],
        2,
    ),
    (
        "निर्वात में प्रकाश की गति (लगभग) कितनी है?",
        ["300,000 km/s", "150,000 km/s", "450,000 km/s", "600,000 km/s"],
        0,
    ),
    (
        "गुइडो वैन रॉसम ने कौन सी प्रोग्रामिंग भाषा बनाई थी?",
        ["जावा", "पायथन", "जावास्क्रिप्ट", "C++"],
        1,
    ),
    ("पानी का आणविक सूत्र क्या है?", ["H2O2", "H2O", "HO2", "H3O"], 1),
    (
        "पहला iPhone किस वर्ष में जारी किया गया था?",
        ["2005", "2006", "2007", "2008"],
        2,
    ),
    (
        "दुनिया का सबसे बड़ा स्तनपायी कौन सा है?",
        ["अफ्रीकी हाथी", "नीली व्हेल", "जिराफ", "ध्रुवीय भालू"],
        1,
    ),
    (
        "सापेक्षता के सिद्धांत की खोज किसने की थी?",
        ["आइजैक न्यूटन", "अल्बर्ट आइंस्टीन", "स्टीफन हॉकिंग", "गैलीलियो गैलीली"],
        1,
    ),
];

/// The bundled fallback questions, one per level.
pub fn builtin_fallback_questions() -> Vec<Question> {
    FALLBACK_QUESTIONS
        .iter()
        .zip(1u8..)
        .filter_map(|((text, options, answer), id)| {
            Question::new(id, *text, options.map(String::from), *answer, None).ok()
        })
        .collect()
}
