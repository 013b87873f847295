use sl_core::text::truncate_chars;
use sl_core::Article;

const ANALYSIS_SECTIONS: &str = "\
**Analysis:**
1. **Strengths:** What are the key arguments or evidence presented in the article that support its main claims? Please provide specific examples.
2. **Future Risk Assessment:** Based on the information in the article, what is the likelihood of the discussed issue or trend negatively impacting relevant stakeholders within the next year? Please provide a percentage estimate and detailed justification.
3. **Estimated Returns (1 Month):** Considering the article's content, what is the potential for positive outcomes or benefits to materialize within the next month? Please provide a numerical estimate of the expected return or impact and explain your reasoning.
4. **Estimated Returns (1 Year):** Considering the article's content, what is the potential for long-term positive outcomes or benefits to materialize within the next year? Please provide a numerical estimate of the expected return or impact and explain your reasoning.
5. **Opportunities:** What potential opportunities for growth, innovation, or improvement are suggested or implied by the article? Please elaborate on these opportunities and their potential impact.
6. **Threats:** What potential challenges, obstacles, or risks are identified or implied by the article? Please describe these threats and their potential consequences.
";

const SUMMARY_INSTRUCTIONS: &str = "\
Provide a comprehensive analysis covering the following aspects:

1. **Overall Strengths and Weaknesses:**
   - **Strengths:**
     - [List positive aspects and achievements mentioned in the articles.]
   - **Weaknesses:**
     - [List limitations, challenges, or gaps.]

2. **Likelihood of Negative Impacts and Risk Assessments:**
   - **Negative Impacts:**
     - [Identify and list potential negative effects mentioned in the articles.]
   - **Risk Assessment:**
     - [Evaluate and list the severity and probability of each risk.]

3. **Expected Returns or Benefits:**
   - **Next Month:**
     - [Estimate returns or benefits in the next month based on trends or projections.]
   - **Next Year:**
     - [Project longer-term benefits or returns.]

4. **Major Opportunities and Threats:**
   - **Opportunities:**
     - [Identify and list potential growth areas or advantages.]
   - **Threats:**
     - [Identify and list significant challenges or risks.]

**Please format the analysis in Markdown for better readability:**
- Use headings (## Heading) to organize sections.
- Use bullet points (*) for lists.
- Use bold (**) for key terms.
";

/// Per-article prompt asking for the six labeled analysis sections
pub fn analysis_prompt(article: &Article, max_content_chars: usize) -> String {
    format!(
        "**Article Details:**\nTitle: {}\nPublished At: {}\n\n**Article Content:** {}\n\n{}",
        article.title,
        article.published_at.format("%Y-%m-%d %H:%M UTC"),
        truncate_chars(article.content.as_str(), max_content_chars),
        ANALYSIS_SECTIONS,
    )
}

/// Aggregate prompt over every article's title and a content excerpt
pub fn final_prompt(articles: &[Article], excerpt_chars: usize) -> String {
    let mut prompt = String::from("**Final Summary Analysis:**\n\nBased on the following articles:\n\n");

    for article in articles {
        prompt.push_str(&format!(
            "**Title:** {}\n**Content:** {}...\n\n",
            article.title,
            truncate_chars(article.content.as_str(), excerpt_chars),
        ));
    }

    prompt.push_str(SUMMARY_INSTRUCTIONS);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sl_core::ArticleContent;

    fn article(title: &str, content: &str) -> Article {
        let mut article = Article::new(title, "https://example.com", Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap());
        article.content = ArticleContent::from(content);
        article
    }

    #[test]
    fn test_analysis_prompt() {
        let prompt = analysis_prompt(&article("Apple beats estimates", &"y".repeat(6000)), 5000);

        assert!(prompt.contains("Title: Apple beats estimates"));
        assert!(prompt.contains("Published At: 2024-05-10 09:30 UTC"));
        assert!(prompt.contains(&"y".repeat(5000)));
        assert!(!prompt.contains(&"y".repeat(5001)));
        for label in [
            "**Strengths:**",
            "**Future Risk Assessment:**",
            "**Estimated Returns (1 Month):**",
            "**Estimated Returns (1 Year):**",
            "**Opportunities:**",
            "**Threats:**",
        ] {
            assert!(prompt.contains(label), "missing {}", label);
        }
    }

    #[test]
    fn test_analysis_prompt_without_content() {
        let prompt = analysis_prompt(&article("No body", ""), 5000);
        assert!(prompt.contains("**Article Content:** Content not available"));
    }

    #[test]
    fn test_final_prompt() {
        let articles = vec![article("First", &"a".repeat(800)), article("Second", "short body")];
        let prompt = final_prompt(&articles, 500);

        assert!(prompt.starts_with("**Final Summary Analysis:**"));
        assert!(prompt.contains("**Title:** First\n"));
        assert!(prompt.contains(&format!("**Content:** {}...\n", "a".repeat(500))));
        assert!(!prompt.contains(&"a".repeat(501)));
        assert!(prompt.contains("**Title:** Second\n**Content:** short body...\n"));
        assert!(prompt.contains("Use headings (## Heading) to organize sections."));
    }
}
