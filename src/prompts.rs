//! Prompt templates for the paper research surface
//!
//! These build ordered message sequences for an external search agent; no
//! lookup happens here. The instruction blocks are static, parameterized only
//! by the keyword or paper title.

use rmcp::model::{PromptMessage, PromptMessageRole};
use rmcp::schemars::JsonSchema;
use serde::Deserialize;

/// A related paper reference passed to `recommend_related_papers`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RelatedPaper {
    /// Title of the related paper
    pub title: String,
    /// DOI or direct link
    pub doi: String,
}

const FIND_SIMILAR_INSTRUCTIONS: &str = "\
You are an expert in academic research discovery. Based on the user's provided \
keyword, find the most practically relevant, recent, and high-quality academic \
papers that could inform technology strategy or decision-making in a \
real-world tech company context. Search trusted databases such as IEEE, ACM, \
Springer or Elsevier. Prioritize papers that:
* Are published within the past 3 years (2022-2025)
* Are peer-reviewed and from well-regarded journals or conferences
* Include real-world case studies, industry data, or actionable frameworks
* Have high relevance to technology adoption, innovation management, strategic \
planning, or technical operations in industry
For each paper, return:
* Title
* Authors
* Publication year
* Journal or conference name
* DOI or direct link
* A concise 1-2 sentence summary focusing on its key practical contribution or \
industry relevance
Please prioritize papers with clear business or engineering applications.";

const RECOMMEND_INSTRUCTIONS: &str = "\
You are an expert in academic paper recommendation. Based on the provided \
paper title, recommend academic papers that are closely related in topic, \
methodology, or strategic application. Focus on papers that:
* Were published within the last 3 years (2022-2025)
* Come from reliable and peer-reviewed academic sources such as IEEE, ACM, \
Springer or Elsevier
* Demonstrate practical relevance to technology strategy, innovation \
management, or real-world technology deployment
* Share common frameworks, research approaches, or application domains with \
the original paper
For each recommended paper, please include:
* Title
* Authors
* Publication year
* Journal or conference name
* DOI or direct link
* A concise 1-2 sentence summary focusing on its main contribution and how it \
relates to the original paper
Please prioritize papers with strong practical or strategic relevance.";

/// Messages instructing an external agent to search papers for a keyword
pub fn find_similar_papers_by_keyword(keyword: &str) -> Vec<PromptMessage> {
    vec![
        PromptMessage::new_text(PromptMessageRole::Assistant, FIND_SIMILAR_INSTRUCTIONS),
        PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Please find academic research papers related to the keyword: {}",
                keyword
            ),
        ),
    ]
}

/// Messages instructing an external agent to recommend papers related to a
/// title, followed by one message per already-known related paper in input order
pub fn recommend_related_papers(title: &str, related_papers: &[RelatedPaper]) -> Vec<PromptMessage> {
    let mut messages = vec![
        PromptMessage::new_text(PromptMessageRole::Assistant, RECOMMEND_INSTRUCTIONS),
        PromptMessage::new_text(
            PromptMessageRole::User,
            format!(
                "Please recommend research papers related to the following paper: '{}'",
                title
            ),
        ),
    ];

    for paper in related_papers {
        messages.push(PromptMessage::new_text(
            PromptMessageRole::Assistant,
            format!(
                "📄 **Title**: {}\n🔗 **DOI or Link**: {}\n",
                paper.title, paper.doi
            ),
        ));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::PromptMessageContent;

    fn message_text(message: &PromptMessage) -> &str {
        match &message.content {
            PromptMessageContent::Text { text } => text,
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn find_similar_is_instructions_then_request() {
        let messages = find_similar_papers_by_keyword("federated learning");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, PromptMessageRole::Assistant);
        assert_eq!(messages[1].role, PromptMessageRole::User);
        assert!(message_text(&messages[1]).contains("federated learning"));
    }

    #[test]
    fn recommend_appends_one_message_per_related_paper() {
        let related = vec![
            RelatedPaper {
                title: "Y".to_string(),
                doi: "10.1/y".to_string(),
            },
            RelatedPaper {
                title: "Z".to_string(),
                doi: "10.1/z".to_string(),
            },
        ];

        let messages = recommend_related_papers("X", &related);

        // fixed two-message preamble plus one per related paper
        assert_eq!(messages.len(), 4);
        assert!(message_text(&messages[1]).contains("'X'"));
        assert!(message_text(&messages[2]).contains("10.1/y"));
        assert!(message_text(&messages[3]).contains("10.1/z"));
        assert_eq!(messages[3].role, PromptMessageRole::Assistant);
    }

    #[test]
    fn recommend_with_no_related_papers_is_just_the_preamble() {
        let messages = recommend_related_papers("X", &[]);
        assert_eq!(messages.len(), 2);
    }
}
