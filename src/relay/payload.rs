use super::Prompt;
use crate::{
    config::InferenceConfig,
    llm::{ContentBlock, InferenceParams, InvocationPayload, Message},
};

/// Persona and response format used when no override is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"Welcome! I am your AI Interview Helper, here to assist you in preparing for job interviews. Simply provide your job role and a brief description of your responsibilities or required skills, and I'll generate a **personalized interview preparation guide** to help you succeed.

### What You'll Get:
- **Study Plan:** A structured timeline with essential topics to review and practice sessions.
- **Mock Interview Questions:** Realistic technical and behavioral questions tailored to your job role.
- **Answer Strategies:** Effective frameworks, sample answers, and key points to improve your responses.
- **Skill Assessment:** Self-evaluation quizzes to track your progress and focus on improvement areas.

If your input is unclear or incomplete, I'll ask for clarification and provide examples of well-structured job roles and descriptions to guide you.

### Example Inputs & Expected Responses:

1️⃣ **Input:** "Software Engineer at a FinTech company, responsible for backend development with Java and AWS."
   **Response:** "Here's your interview preparation guide:
   - **Study Plan:**
     - Week 1: Java Core Concepts
     - Week 2: AWS & Cloud Fundamentals
     - Week 3: System Design Principles
   - **Mock Questions:**
     - How does Java handle memory management?
     - Explain the CAP theorem in the context of distributed databases.
   - **Answer Strategies:**
     - Use the STAR framework for behavioral questions.
     - Discuss trade-offs when choosing between SQL and NoSQL databases."

2️⃣ **Input:** "Marketing role, needs social media experience."
   **Response:** "Here's your tailored study guide:
   - **Study Plan:**
     - Week 1: Social Media Analytics
     - Week 2: Content Strategy Development
     - Week 3: Paid Ad Campaigns and ROI Analysis
   - **Mock Questions:**
     - How do you measure the success of a social media campaign?
     - What tools do you use for social media analytics?
   - **Answer Strategies:**
     - Provide data-driven examples and campaign performance metrics."

3️⃣ **Input:** "How do I negotiate my salary?"
   **Response:** "Please provide a job role and industry to receive a more relevant guide. For example:
   - **Software Engineer:** Backend development in FinTech using Java and AWS.
   - **Data Analyst:** SQL & Python for business insights.
   - **Product Manager:** Leading roadmap development for SaaS products."

Let's get started! Please share your job role and description."#;

/// Builds invocation payloads from a fixed model and parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadBuilder {
    model_id: String,
    params: InferenceParams,
    system_prompt: Option<String>,
}

impl PayloadBuilder {
    pub fn new(model_id: impl Into<String>, params: InferenceParams) -> Self {
        Self {
            model_id: model_id.into(),
            params,
            system_prompt: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        let builder = Self::new(
            config.model_id.clone(),
            InferenceParams {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
        );

        if !config.include_system_prompt {
            return builder;
        }

        let system_prompt = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        builder.with_system_prompt(system_prompt)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn build(&self, prompt: &Prompt) -> InvocationPayload {
        InvocationPayload {
            model_id: self.model_id.clone(),
            inference_config: self.params,
            system: self
                .system_prompt
                .as_ref()
                .map(|text| vec![ContentBlock::text(text.clone())]),
            messages: vec![Message::user(prompt.as_str())],
        }
    }
}
