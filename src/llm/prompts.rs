use crate::models::CandidateItem;

pub const RANKING_INSTRUCTIONS: &str = "Rank the following articles from most to least important. \
Output a numbered list in ranked order. For each article output only its title and, on the next line, its URL exactly as given.\n";

pub const SUMMARY_INSTRUCTIONS: &str = "Summarize the following text concisely in three sentences.";

pub fn ranking_prompt(items: &[CandidateItem]) -> String {
    let mut prompt = String::from(RANKING_INSTRUCTIONS);

    for (i, item) in items.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n{}\n", i + 1, item.title, item.link));
    }

    prompt
}

pub fn summary_prompt(content: &str) -> String {
    format!("{}\n\n---\n{}\n---", SUMMARY_INSTRUCTIONS, content)
}
