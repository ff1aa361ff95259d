//! Prompt templates for the three generation phases

/// Phase one: ask for the best-suited expert as `<title>. <description>`
pub fn expert_synthesis(user_input: &str) -> String {
    format!(
        "Act as an expert prompt engineer. Analyze the following input to determine the title and \
         characteristics of the best expert to answer the question. Begin your reply with the expert's \
         title followed by a period ['.'], then provide a concise description of that expert: {}",
        user_input
    )
}

/// Phase two: answer the request in the persona's voice
pub fn expert_answer(title: &str, user_input: &str) -> String {
    format!(
        "Act as {}, an expert on the subject, and provide a complete, well-formatted answer to the \
         following question: {}",
        title, user_input
    )
}

/// Phase three: review and improve a prior answer
pub fn refinement(title: &str, user_input: &str, prior_answer: &str) -> String {
    format!(
        "Act as {}, an expert on the subject. Here is the original answer to the question '{}': {}\n\n\
         Please thoroughly review and refine this answer, making improvements and addressing any \
         shortcomings. Return an updated version of the answer that incorporates your refinements.",
        title, user_input, prior_answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_prompt_requests_period_delimiter() {
        let prompt = expert_synthesis("Explain tides");
        assert!(prompt.contains("prompt engineer"));
        assert!(prompt.contains("['.']"));
        assert!(prompt.ends_with("Explain tides"));
    }

    #[test]
    fn test_answer_prompt_names_expert() {
        let prompt = expert_answer("Oceanographer", "Explain tides");
        assert!(prompt.starts_with("Act as Oceanographer,"));
        assert!(prompt.contains("well-formatted"));
        assert!(prompt.ends_with("Explain tides"));
    }

    #[test]
    fn test_refinement_prompt_embeds_everything() {
        let prompt = refinement("Oceanographer", "Explain tides", "Tides are caused by...");
        assert!(prompt.contains("Act as Oceanographer"));
        assert!(prompt.contains("'Explain tides'"));
        assert!(prompt.contains("Tides are caused by..."));
        assert!(prompt.contains("updated version"));
    }
}
