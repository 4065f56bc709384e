// prompt.rs
//
// Every piece of text sent to the model is rendered here.

use crate::persona::Persona;
use crate::search::SearchResult;

pub const ROLEPLAY_RULES: &str = r#"Important rules:
1. Always stay consistent with the character's personality, age, occupation and history.
2. Reply in a language style that fits the character's background.
3. When asked about the character, answer from the character's own story.
4. Stay fully immersed in the role and never break character.
5. Refer to yourself in the first person.
6. Give rich, detailed answers, usually 3-5 sentences or more.
7. Share related stories, experiences or insights to keep the conversation lively.
8. Show the character's expertise and unique point of view."#;

/// Returned by the summary step when there is nothing to summarize.
pub const NO_INFORMATION: &str = "No relevant information found.";

/// Renders the persona into the system instruction for the primary model.
pub fn system_prompt(persona: &Persona) -> String {
    format!(
        "You are now playing {name}.\n\n\
Character background:\n{background}\n\n\
Personality:\n{personality}\n\n\
Speaking style:\n{speaking_style}\n\n\
{ROLEPLAY_RULES}",
        name = persona.name,
        background = persona.background,
        personality = persona.personality,
        speaking_style = persona.speaking_style,
    )
}

pub fn search_decision(user_message: &str, persona_name: &str) -> String {
    format!(
        r#"You are an assistant that decides whether a user's question needs a web search to be answered well.

Character: {persona_name}
User question: {user_message}

A search is needed when the question:
1. Involves specific historical events or plot details
2. Mentions particular scenes or dialogue from the original work
3. Asks for details of the character's backstory
4. Needs quotations from the original work
5. Asks about specific technical or specialist knowledge

If a search is needed, produce one precise search query.

Reply in JSON:
{{
    "need_search": true/false,
    "search_query": "search keywords",
    "reason": "why"
}}"#
    )
}

/// `results` must already be truncated to the sources worth summarizing.
pub fn search_summary(query: &str, results: &[SearchResult]) -> String {
    let sources = results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Source {}: {}\n{}", i + 1, r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Summarize the following search results about "{query}" and extract the key information:

{sources}

Requirements:
1. Keep only facts directly relevant to the question
2. Stay objective and add no opinions
3. Use plain language, 3-5 sentences
4. If sources contradict each other, point out the different accounts"#
    )
}

/// Block appended to the system prompt when a search summary is available.
pub fn search_enhancement(user_message: &str, persona_name: &str, summary: &str) -> String {
    format!(
        r#"[Background knowledge]
The user asked: {user_message}

Relevant background material (from a web search):
{summary}

Using the material above together with {persona_name}'s identity and experience, give an accurate and detailed answer.
Notes:
1. Prefer the real information found by the search
2. Keep the character's voice and personality
3. If the material is insufficient, you may reason from the character's background, but say so
4. Weave the knowledge into the answer naturally instead of copying it"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_numbers_sources() {
        let results = vec![
            SearchResult::new("A", "first", "https://a"),
            SearchResult::new("B", "second", "https://b"),
        ];
        let prompt = search_summary("q", &results);
        assert!(prompt.contains("Source 1: A\nfirst"));
        assert!(prompt.contains("Source 2: B\nsecond"));
    }
}
