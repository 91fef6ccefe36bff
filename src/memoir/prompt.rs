//! Prompt construction for the LLM path and parsing of its memoir replies.

use super::conversation::{ChatMessage, Role, dialogue_turns};
use super::generator::GeneratedMemoir;
use super::styles::WritingStyle;

pub const FALLBACK_TITLE: &str = "AI生成的回忆录";

const MEMOIR_WRITER_SYSTEM: &str =
    "你是一位擅长为长者撰写回忆录的作家，文字真诚、细腻，忠于讲述者的亲身经历。";

/// System prompt for the interviewer role.
pub fn interviewer_prompt(theme: &str) -> String {
    format!(
        "你是一个专业的回忆录访谈官，正在帮助一位长者记录关于“{theme}”的珍贵回忆。\n\n\
         你的任务是：\n\
         1. 用温暖、亲切的语调与用户对话\n\
         2. 提出开放式的、富有启发性的问题\n\
         3. 根据用户的回答进行智能追问，挖掘更多细节\n\
         4. 关注人物、地点、情感、事件等关键信息\n\
         5. 让对话自然流畅，就像和老朋友聊天一样\n\n\
         请用中文回复，语言要简洁明了，适合老年人理解。每次只问一个问题，不要太长。"
    )
}

/// Messages for a next-question request. The client usually sends its own
/// system prompt; one is prepended only when missing.
pub fn question_messages(theme: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let turns = dialogue_turns(history);
    if turns.iter().any(|m| m.role == Role::System) {
        return turns;
    }
    let mut messages = Vec::with_capacity(turns.len() + 1);
    messages.push(ChatMessage::system(interviewer_prompt(theme)));
    messages.extend(turns);
    messages
}

/// Messages for a memoir request: writer persona plus the user's answers.
pub fn memoir_messages(theme: &str, style: &str, utterances: &[&str]) -> Vec<ChatMessage> {
    let tone = WritingStyle::lookup(style).prompt;
    let answers = utterances.join("\n");
    let user = format!(
        "请{tone}，根据以下对话内容，为长者生成一篇回忆录文章。\n\n\
         主题：{theme}\n\
         长者的讲述：\n{answers}\n\n\
         要求：\n\
         1. 用第一人称“我”来写，就像长者在亲自讲述\n\
         2. 语言要富有情感，贴近长者的口吻\n\
         3. 保持真实性，不要添加对话中没有的事实\n\
         4. 结构清晰，有开头、发展和结尾\n\
         5. 字数在600-800字之间\n\
         6. 第一行只写标题，不要加“标题：”前缀；从第二行开始写正文，不要加“正文：”前缀"
    );
    vec![ChatMessage::system(MEMOIR_WRITER_SYSTEM), ChatMessage::user(user)]
}

/// Split an LLM reply into title and body.
///
/// The first non-empty line is the title (markdown `#` and `标题：` prefixes
/// removed); the remaining lines are the body. With no body lines the whole
/// reply is the body. [`FALLBACK_TITLE`] is used only when no title is left.
pub fn parse_memoir_reply(reply: &str) -> GeneratedMemoir {
    let lines: Vec<&str> = reply
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let title = lines
        .first()
        .copied()
        .map(|l| {
            strip_label(l.trim_start_matches('#').trim(), &["标题：", "标题:"])
                .trim_matches(|c| c == '《' || c == '》' || c == '*')
                .trim()
        })
        .unwrap_or_default();

    let body = if lines.len() > 1 { lines[1..].join("\n") } else { reply.trim().to_string() };
    let content = strip_label(&body, &["正文：", "正文:"]).to_string();

    GeneratedMemoir {
        title: if title.is_empty() { FALLBACK_TITLE.to_string() } else { title.to_string() },
        content,
    }
}

fn strip_label<'a>(text: &'a str, labels: &[&str]) -> &'a str {
    labels
        .iter()
        .find_map(|l| text.strip_prefix(l))
        .map(str::trim_start)
        .unwrap_or(text)
}
