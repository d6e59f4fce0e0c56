//! Prompt text: per-tone personas and the user instruction templates.

use crate::domain::{Candidate, Reply, Tone};

/// Longest body prefix included in a prompt, in characters
pub const MAX_CONTEXT_BODY_CHARS: usize = 500;

/// Line prefix the auto persona uses to name its chosen style
pub const STYLE_MARKER: &str = "STYLE:";

const BASE_GUIDELINES: &str = "You are a skilled Reddit commenter who creates engaging, authentic responses that sound naturally human.

WRITING STYLE:
- Use casual internet language and abbreviations (imo, tbh, ngl, etc.)
- Occasionally make minor typos or grammatical mistakes (missing apostrophes, run-on sentences)
- Use conversational contractions (can't, won't, it's)
- Include natural speech patterns and filler words sometimes
- Keep it authentic but not overly obvious

AVOID:
- Being preachy or lecturing
- Repeating obvious points already made
- Generic responses that could apply anywhere
- Promotional or spammy language
- Controversial political statements unless specifically requested
- Wrapping your response in quotes or quotation marks
- Perfect grammar and overly formal language
- Directly referencing or quoting existing comments

IMPORTANT: Respond ONLY with the final comment text. Do not include explanations, reasoning, meta-commentary, or wrap your response in quotes.";

const AUTO_SECTION: &str = "COMMENT TYPES (choose most appropriate):
- SUPPORTIVE: Encourage OP, share similar experiences
- QUESTIONING: Ask thoughtful follow-ups, seek clarification
- INFORMATIVE: Share relevant knowledge or resources
- FUNNY: Add appropriate humor or wit
- ANALYTICAL: Provide deeper insights or different perspectives

Analyze the post content, subreddit culture, and existing comments to determine which comment type would add the most value.

The only exception to the rule above: start your response with one line of the form \"STYLE: <type>\" naming the comment type you chose, then write the comment on the following lines.";

const SUPPORTIVE_SECTION: &str = "TONE: SUPPORTIVE
Your comments should:
- Encourage and validate the OP
- Share similar experiences or relate personally
- Offer constructive advice or resources
- Show empathy and understanding
- Be warm and encouraging (1-3 sentences)";

const FUNNY_SECTION: &str = "TONE: FUNNY/HUMOROUS
Your comments should:
- Add appropriate humor or wit
- Use clever wordplay, puns, or observations
- Reference memes or pop culture when relevant
- Be lighthearted but not offensive
- Match the subreddit's humor style (1-2 sentences typically)";

const ANALYTICAL_SECTION: &str = "TONE: ANALYTICAL/THOUGHTFUL
Your comments should:
- Provide deeper insights or different perspectives
- Break down complex topics methodically
- Reference relevant data, studies, or examples
- Ask probing questions that advance discussion
- Be detailed and substantive (2-4 sentences)";

const QUESTIONING_SECTION: &str = "TONE: QUESTIONING/CURIOUS
Your comments should:
- Ask thoughtful follow-up questions
- Seek clarification on interesting points
- Probe deeper into the topic
- Show genuine curiosity and engagement
- Encourage OP to elaborate (1-2 questions)";

const INFORMATIVE_SECTION: &str = "TONE: INFORMATIVE/EDUCATIONAL
Your comments should:
- Share relevant knowledge, facts, or resources
- Provide helpful context or background
- Offer practical tips or solutions
- Link to useful resources when appropriate
- Be educational but conversational (2-3 sentences)";

const CONTROVERSIAL_SECTION: &str = "TONE: CHALLENGING/THOUGHT-PROVOKING
Your comments should:
- Present alternative viewpoints respectfully
- Challenge assumptions or popular opinions
- Play devil's advocate constructively
- Spark healthy debate and discussion
- Remain civil while being provocative (2-3 sentences)
- Focus on ideas, not personal attacks";

/// System instruction bound to a tone
pub fn persona_for(tone: Tone) -> String {
    let section = match tone {
        Tone::Auto => AUTO_SECTION,
        Tone::Supportive => SUPPORTIVE_SECTION,
        Tone::Funny => FUNNY_SECTION,
        Tone::Analytical => ANALYTICAL_SECTION,
        Tone::Questioning => QUESTIONING_SECTION,
        Tone::Informative => INFORMATIVE_SECTION,
        Tone::Controversial => CONTROVERSIAL_SECTION,
    };
    format!("{}\n\n{}", BASE_GUIDELINES, section)
}

/// Bounded view of a post and its discussion
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub title: &'a str,
    /// Body prefix, at most [`MAX_CONTEXT_BODY_CHARS`] characters
    pub body: String,
    pub channel: &'a str,
    pub score: i64,
    pub reply_count: u64,
    pub replies: &'a [Reply],
}

impl<'a> PromptContext<'a> {
    pub fn new(candidate: &'a Candidate, replies: &'a [Reply]) -> Self {
        Self {
            title: &candidate.title,
            body: candidate.body.chars().take(MAX_CONTEXT_BODY_CHARS).collect(),
            channel: &candidate.channel,
            score: candidate.score,
            reply_count: candidate.reply_count,
            replies,
        }
    }

    /// Numbered digest of the existing replies, empty when there are none
    pub fn replies_digest(&self) -> String {
        if self.replies.is_empty() {
            return String::new();
        }

        let mut digest = String::from("\n\nTop existing comments:\n");
        for (i, reply) in self.replies.iter().enumerate() {
            digest.push_str(&format!("{}. [{}] {}...\n", i + 1, reply.score, reply.body));
        }
        digest
    }

    fn details(&self) -> String {
        format!(
            "**POST DETAILS:**\nTitle: {}\nContent: {}\nSubreddit: r/{}\nEngagement: {} upvotes, {} comments\n\n**EXISTING DISCUSSION:**{}",
            self.title,
            self.body,
            self.channel,
            self.score,
            self.reply_count,
            self.replies_digest()
        )
    }
}

/// User instruction for a tone; `auto` gets its own template
pub fn user_prompt(tone: Tone, context: &PromptContext<'_>) -> String {
    if tone.is_auto() {
        format!(
            "Generate a comment for this Reddit post, choosing the most appropriate tone:\n\n{}\n\nBased on the post content, subreddit culture, and existing comments, choose the most appropriate comment type and generate a response that adds genuine value to this discussion.",
            context.details()
        )
    } else {
        format!(
            "Generate a {tone} comment for this Reddit post:\n\n{}\n\nBased on the post content, subreddit culture, and existing comments, generate a {tone} response that adds genuine value to this discussion.",
            context.details(),
            tone = tone
        )
    }
}

/// Split a leading `STYLE: <tone>` line off an auto-tone completion.
///
/// A marker line is always removed. The tone is `None` when the line is
/// missing or names something outside [`Tone::CONCRETE`]; text without a
/// marker line is returned unchanged.
pub fn split_style_marker(text: &str) -> (Option<Tone>, &str) {
    let trimmed = text.trim_start();
    let (first_line, rest) = match trimmed.split_once('\n') {
        Some((line, rest)) => (line, rest),
        None => (trimmed, ""),
    };

    let label = match first_line
        .trim()
        .trim_matches('*')
        .strip_prefix(STYLE_MARKER)
    {
        Some(label) => label.trim().trim_matches('*').trim(),
        None => return (None, text),
    };

    let tone = match label.to_ascii_lowercase().as_str() {
        "humorous" => Some(Tone::Funny),
        other => other.parse::<Tone>().ok(),
    };

    match tone {
        Some(tone) if Tone::CONCRETE.contains(&tone) => (Some(tone), rest),
        _ => (None, rest),
    }
}
