//! Static theme catalog.
//!
//! A theme drives which guiding questions the template generator asks, how
//! many answers make a complete dialogue, and which titles a generated memoir
//! can carry. Any unrecognised theme name resolves to [`DEFAULT_THEME`].

pub const DEFAULT_THEME: &str = "童年时光";

#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    /// Answers needed before the dialogue counts as complete.
    pub max_questions: usize,
    pub titles: &'static [&'static str],
    pub questions: &'static [&'static str],
    /// Asked once every question in `questions` has been answered.
    pub closing_question: &'static str,
    /// Body used when a memoir is generated from an empty dialogue.
    pub generic_body: &'static str,
}

impl Theme {
    /// Find a theme by name, falling back to the default theme.
    pub fn lookup(name: &str) -> &'static Theme {
        Self::find(name).unwrap_or(&THEMES[0])
    }

    /// Exact lookup without fallback.
    pub fn find(name: &str) -> Option<&'static Theme> {
        let name = name.trim();
        THEMES.iter().find(|t| t.name == name)
    }

    #[cfg(test)]
    pub(crate) fn all() -> &'static [Theme] {
        THEMES
    }
}

static THEMES: &[Theme] = &[
    Theme {
        name: DEFAULT_THEME,
        max_questions: 8,
        titles: &["童年的美好时光", "那些无忧无虑的日子", "记忆深处的童年", "小时候的故事"],
        questions: &[
            "您小时候住在哪个地方呢？那里是什么样子的？",
            "小时候您最喜欢和小伙伴们玩什么游戏？",
            "您还记得家里是什么样子的吗？院子里、屋子里有什么让您印象深刻的东西？",
            "小时候家里谁最疼您？能说说和他（她）有关的一件事吗？",
            "过年过节的时候，家里都会做些什么？",
            "小时候有没有哪件事让您特别开心，或者特别难过？",
            "您小时候最爱吃的东西是什么？",
            "回想起童年，您最怀念的是什么？",
        ],
        closing_question: "您分享的童年故事真让人温暖。还有什么想补充的吗？如果没有，我们就可以为您整理成一篇回忆录了。",
        generic_body: "小时候的日子过得很慢，慢到一个夏天仿佛有一辈子那么长。那时候家里并不富裕，可每一天都充满了新鲜和快乐。",
    },
    Theme {
        name: "求学之路",
        max_questions: 8,
        titles: &["求学路上的点点滴滴", "我的求学岁月", "书声琅琅的年代", "难忘的校园时光"],
        questions: &[
            "您是在哪里上的学？学校是什么样子的？",
            "您还记得第一天上学时的情景吗？",
            "有没有哪位老师让您特别难忘？",
            "您和同学们之间有什么有趣的故事吗？",
            "那时候上学辛苦吗？每天是怎么去学校的？",
            "您最喜欢哪门功课？为什么？",
            "求学路上遇到过什么困难吗？后来是怎么克服的？",
            "回想起那段求学的日子，您最想对当年的自己说些什么？",
        ],
        closing_question: "谢谢您讲述这段求学经历。还有想补充的细节吗？没有的话，我们就可以生成回忆录了。",
        generic_body: "那个年代，能读上书是一件了不起的事。课本是一页页翻旧的，铅笔是一点点削短的，可求知的心从来没有变过。",
    },
    Theme {
        name: "工作经历",
        max_questions: 10,
        titles: &["奋斗的足迹", "我的工作岁月", "汗水浇灌的年华", "岗位上的青春"],
        questions: &[
            "您的第一份工作是什么？是怎么找到的？",
            "第一天上班时，您是什么样的心情？",
            "工作中有没有哪位师傅或同事对您帮助很大？",
            "您工作过的地方是什么样的环境？",
            "工作中最辛苦的一段时间是什么时候？",
            "有没有哪件事让您特别有成就感？",
            "工作中遇到过什么难关吗？您是怎么挺过来的？",
            "您和同事们之间有什么难忘的故事？",
            "这份工作给您的生活带来了哪些改变？",
            "回顾工作经历，您最自豪的是什么？",
        ],
        closing_question: "您的工作经历真是让人敬佩。还有其他想说的吗？如果没有，我们就为您生成回忆录吧。",
        generic_body: "参加工作的那些年，日子是靠一双手一点点干出来的。有过起早贪黑的辛苦，也有过完成任务时的踏实与骄傲。",
    },
    Theme {
        name: "职场岁月",
        max_questions: 10,
        titles: &["职场岁月的光辉", "工厂里的光辉岁月", "奋斗的年代", "我的职业生涯"],
        questions: &[
            "您的第一份工作是在哪里？做的是什么？",
            "还记得刚参加工作时的样子吗？",
            "单位里有没有让您难忘的人？",
            "有没有哪个项目或任务让您印象特别深？",
            "工作中最忙的时候是什么样子的？",
            "您在工作中获得过什么表彰或认可吗？",
            "工作上遇到过什么挫折吗？",
            "那时候下班以后，大家都做些什么？",
            "工作这些年，您学到的最重要的一课是什么？",
            "如果让您再选一次，您还会选择这份工作吗？",
        ],
        closing_question: "这些职场故事真精彩。还有要补充的吗？没有的话，我们就可以整理成回忆录了。",
        generic_body: "在岗位上度过的那些年，是人生中最有干劲的时光。每一次加班、每一份认真，都化作了今天回想时的底气。",
    },
    Theme {
        name: "情感生活",
        max_questions: 8,
        titles: &["情深似海", "爱的故事", "相守的岁月", "心中的那个人"],
        questions: &[
            "您和老伴是怎么认识的？",
            "还记得第一次见面时的情景吗？",
            "那时候你们是怎么约会的？",
            "您们结婚时是什么样的场景？",
            "生活中有没有哪件小事让您觉得特别温暖？",
            "遇到困难的时候，你们是怎么互相扶持的？",
            "您觉得一段感情最重要的是什么？",
            "有什么话想对那个人说吗？",
        ],
        closing_question: "您的感情故事真让人动容。还有想补充的吗？没有的话，我们就为您写成回忆录。",
        generic_body: "感情这件事，说起来平平淡淡，过起来却是一天天的相守。那些不经意的关心，才是岁月里最珍贵的东西。",
    },
    Theme {
        name: "家庭回忆",
        max_questions: 8,
        titles: &["家的温暖", "我们这一家", "家中的岁月", "血浓于水"],
        questions: &[
            "您家里有几口人？能介绍一下家里人吗？",
            "家里最热闹的时候是什么样子的？",
            "父母给您留下最深的印象是什么？",
            "您和兄弟姐妹之间有什么难忘的事吗？",
            "家里有没有什么传统或者规矩？",
            "家里经历过什么困难的时期吗？",
            "您最珍惜的一段家庭时光是什么？",
            "您希望家里的晚辈记住些什么？",
        ],
        closing_question: "谢谢您分享这些家庭回忆。还有要补充的吗？没有的话，我们就可以生成回忆录了。",
        generic_body: "家是一个说不完的话题。一张饭桌、一盏灯、几句家常，撑起了一家人风风雨雨的日子。",
    },
    Theme {
        name: "家庭生活",
        max_questions: 8,
        titles: &["家的温暖", "柴米油盐的幸福", "养儿育女的日子", "我们的小家"],
        questions: &[
            "您是怎么组建起自己的小家的？",
            "孩子出生的时候，您是什么心情？",
            "养育孩子的过程中，有没有什么难忘的事？",
            "那时候一家人的日常生活是什么样的？",
            "家里最困难的时候，是怎么挺过来的？",
            "您们家有什么特别的习惯或节日传统吗？",
            "孩子们长大后，有什么让您欣慰的事？",
            "您对家人最想说的一句话是什么？",
        ],
        closing_question: "这些家庭故事真温馨。还有什么想说的吗？没有的话，我们就为您生成回忆录。",
        generic_body: "过日子就是柴米油盐，一家人在一起，再平常的日子也有滋有味。孩子们一天天长大，家也一天天热闹起来。",
    },
    Theme {
        name: "人生感悟",
        max_questions: 6,
        titles: &["岁月的馈赠", "人生的感悟", "走过的路", "写给后来的人"],
        questions: &[
            "回顾这一生，您觉得最重要的转折点是什么？",
            "有没有哪句话影响了您一辈子？",
            "您觉得自己这一生最骄傲的事是什么？",
            "如果能回到过去，您最想改变什么？",
            "您觉得什么才是幸福？",
            "您最想把什么样的人生经验留给后辈？",
        ],
        closing_question: "您的人生感悟很珍贵。还有想说的吗？没有的话，我们就把这些整理成回忆录。",
        generic_body: "人这一辈子，走过的路、吃过的苦、见过的人，最后都会沉淀成几句朴素的道理。",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_theme_found() {
        let t = Theme::lookup("工作经历");
        assert_eq!(t.name, "工作经历");
        assert_eq!(t.max_questions, 10);
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let t = Theme::lookup("太空探险");
        assert_eq!(t.name, DEFAULT_THEME);
        assert!(Theme::find("太空探险").is_none());
        assert_eq!(Theme::lookup("").name, DEFAULT_THEME);
    }

    #[test]
    fn lookup_trims_whitespace() {
        assert_eq!(Theme::lookup(" 人生感悟 ").name, "人生感悟");
    }

    #[test]
    fn every_theme_is_complete() {
        for t in Theme::all() {
            assert!(!t.titles.is_empty(), "{} has no titles", t.name);
            assert_eq!(t.questions.len(), t.max_questions, "{} question table size", t.name);
            assert!(!t.generic_body.is_empty());
        }
    }
}
