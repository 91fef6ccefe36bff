//! Writing-style presets.
//!
//! Each style carries the catalog entry served by `/api/writing-styles` and
//! the phrase templates the template generator stitches around user answers.
//! `{theme}` inside a template is replaced with the theme name.

use std::collections::BTreeMap;

use serde::Serialize;

pub const DEFAULT_STYLE: &str = "warm";

#[derive(Debug)]
pub struct WritingStyle {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Tone instruction prepended to LLM memoir prompts.
    pub prompt: &'static str,
    pub opening: &'static str,
    /// Lead-ins placed before each quoted answer, used round-robin.
    pub connectors: &'static [&'static str],
    /// Lines following each answer, used round-robin.
    pub reflections: &'static [&'static str],
    pub closing: &'static str,
}

/// Public catalog entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StyleInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub prompt: &'static str,
}

impl WritingStyle {
    /// Find a style by key, falling back to `warm`.
    pub fn lookup(key: &str) -> &'static WritingStyle {
        let key = key.trim();
        STYLES.iter().find(|s| s.key == key).unwrap_or(&STYLES[0])
    }

    pub fn info(&self) -> StyleInfo {
        StyleInfo {
            name: self.name,
            description: self.description,
            icon: self.icon,
            prompt: self.prompt,
        }
    }
}

/// `{ "warm": {...}, "vivid": {...}, ... }`: the shape the client expects.
pub fn catalog() -> BTreeMap<&'static str, StyleInfo> {
    STYLES.iter().map(|s| (s.key, s.info())).collect()
}

static STYLES: &[WritingStyle] = &[
    WritingStyle {
        key: DEFAULT_STYLE,
        name: "温馨怀旧",
        description: "温暖亲切的叙述，充满怀念之情",
        icon: "🌟",
        prompt: "以温暖怀旧的语调",
        opening: "每当回想起{theme}，心里总会涌起一股暖流。那些日子虽然已经远去，却像一盏不灭的灯，一直亮在我的记忆深处。",
        connectors: &["我还清楚地记得，", "说起那时候，", "直到今天，我仍然会想起，", "那段日子里，"],
        reflections: &[
            "如今想来，那份温暖依旧清晰如昨。",
            "这些平凡的点滴，成了我心中最柔软的回忆。",
            "岁月流转，这份情意却从未褪色。",
        ],
        closing: "时光匆匆，转眼已是大半辈子。可每当想起{theme}里的人和事，我的嘴角总会不自觉地扬起。这些回忆是我一生最珍贵的财富，我愿把它们写下来，留给家人，也留给自己。",
    },
    WritingStyle {
        key: "vivid",
        name: "生动叙述",
        description: "详细生动的描述，如临其境",
        icon: "🎨",
        prompt: "以生动详细的描述",
        opening: "闭上眼睛，{theme}里的画面便一帧一帧地浮现出来：声音、气味、光影，都鲜活得仿佛就在昨天。",
        connectors: &["画面一转，", "我记得很清楚，", "那一幕至今历历在目：", "再往下说，"],
        reflections: &[
            "那时的声音和色彩，仿佛还在耳边、在眼前。",
            "每一个细节都那样真切，好像伸手就能触碰到。",
            "那样的场景，只有亲身经历过的人才会懂。",
        ],
        closing: "这些画面串在一起，就是我的{theme}。它们或许平凡，却是我真真切切走过的路。把它们一笔一笔记下来，就像重新活了一遍。",
    },
    WritingStyle {
        key: "poetic",
        name: "诗意抒情",
        description: "富有诗意的表达，情感丰富",
        icon: "🌸",
        prompt: "以诗意抒情的笔调",
        opening: "岁月是一条长长的河，{theme}是河面上最亮的那一片波光。",
        connectors: &["记忆的风轻轻吹来，", "那时光里，", "如同一首旧歌，", "在时间的另一头，"],
        reflections: &[
            "像一朵花，在心底静静开放。",
            "那是岁月写给我的一行诗。",
            "风吹过，往事便轻轻摇曳。",
        ],
        closing: "流年似水，{theme}却如星光，照亮我走过的每一段路。愿这些文字，替我把那些温柔的时光，轻轻收藏。",
    },
    WritingStyle {
        key: "simple",
        name: "朴实真挚",
        description: "朴素真实的表达，平实感人",
        icon: "💝",
        prompt: "以朴实真挚的语言",
        opening: "说起{theme}，没有什么惊天动地的大事，都是些平平常常的日子。",
        connectors: &["那时候，", "我记得，", "还有一件事，", "后来，"],
        reflections: &[
            "日子就是这么过来的。",
            "现在想想，挺好的。",
            "这些事，我一直记在心里。",
        ],
        closing: "这就是我的{theme}。话不多，都是实在的经历。写下来，是想让孩子们知道，我们那一代人是怎么过来的。",
    },
];
