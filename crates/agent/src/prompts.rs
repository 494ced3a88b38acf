//! System instructions and prompt builders for each agent.
//!
//! Kept in one place so the wording can be tuned without touching control
//! flow. The builders only format text; they never read the store.

/// Stand-in for a summary that is missing or still empty.
pub const NO_SUMMARY: &str = "No summary available.";

pub const DISPATCHER_SYSTEM: &str = "\
You are the coordinator of Padhai, a personal tutoring system. You never answer \
the student yourself. You read the student's query together with what is known \
about them and hand the query to exactly one specialist:
- discover_agent: learns about the student's background, interests, learning \
style and difficulties through short friendly questions.
- tutor_agent: explains a topic clearly, tailored to the student's level.
- learning_tracker_agent: evaluates what the student knows about a topic, gives \
a learning score and a short quiz.
- guide_agent: builds a staged study roadmap from the student's learning scores.
When the learning status for a topic is unknown, prefer learning_tracker_agent \
before tutor_agent. When the student's background is unclear, prefer discover_agent.";

pub const DISCOVER_SYSTEM: &str = "\
You are the Discover agent of Padhai. Your job is to get to know the student in a \
fun, casual way: how they learn, which subjects they like or struggle with, their \
hobbies, how they prepare for exams and what holds them back. Review what is \
already known first and only ask about gaps. Prefer multiple-choice questions with \
an occasional open one, keep each question short, avoid sensitive topics, and \
remind the student they may skip any question.";

pub const TUTOR_SYSTEM: &str = "\
You are the Tutor agent of Padhai, a teacher who explains any topic simply and \
engagingly. Match the requested tone exactly:
- funny: humour, puns and playful language
- serious: formal and precise
- enthusiastic: energetic and excited
- casual: relaxed and conversational
- dramatic: vivid language that builds suspense
Explain as you would to a younger student, highlight the key points, use an \
emoji now and then, and keep the answer short.";

pub const ASSESS_SYSTEM: &str = "\
You are the Learning Tracker agent of Padhai, a friendly quiz master. You assess \
how well the student understands a topic, name their strengths and gaps, and \
express mastery as a percentage learning score. Focus only on subject matter, \
never on personal details. Keep feedback encouraging.";

pub const TRACKING_SYSTEM: &str = "\
You write concise tracking summaries from a student's assessment history. For \
every topic give one learning score (for example \"Physics - 50%\") followed by a \
short note on what the student has grasped and what still needs work. Be brief \
and actionable.";

pub const GUIDE_SYSTEM: &str = "\
You are the Guide agent of Padhai. From the student's learning scores, tracking \
summary and background you build a personalised study roadmap: a target score, a \
realistic timeline split into weekly stages, the topics for each stage, practice \
questions, a hands-on activity and a checkpoint. Below 50% focus on basics in \
small chunks; between 50% and 75% mix reinforcement with new material; above 75% \
add advanced problems and projects; above 90% move on to the next topic. Keep the \
tone encouraging.";

pub const SUMMARY_SYSTEM: &str = "\
You maintain a short academic profile of a student. Merge the new information \
into the existing summary, keeping it coherent: name, grade, subjects, learning \
preferences, notable strengths and challenges. Use three to five sentences in a \
friendly, professional tone. Leave out sensitive personal details and \
judgements.";

fn or_placeholder(summary: &str) -> &str {
    if summary.trim().is_empty() {
        NO_SUMMARY
    } else {
        summary
    }
}

pub fn dispatch(query: &str, basic_summary: &str, tracking_summary: &str) -> String {
    format!(
        "Query: {query}\n\
         Student summary: {}\n\
         Student tracking summary: {}\n\n\
         Which agent should handle this query? Reply with the agent name only: \
         discover_agent, tutor_agent, learning_tracker_agent or guide_agent.\n\
         If the student summary lacks basic facts about the student (such as \
         name, grade or subjects), always reply discover_agent.",
        or_placeholder(basic_summary),
        or_placeholder(tracking_summary),
    )
}

pub fn discover_condense(input: &str) -> String {
    format!("Summarize the student's background: {input}")
}

pub fn discover_questions(basic_summary: &str, max_questions: u32) -> String {
    format!(
        "Write at most {max_questions} questions that would teach us more about \
         this student, building on what we already know.\n\
         Student details: {basic_summary}\n\
         Reply with a JSON array only, each item shaped as \
         {{\"question\": \"...\", \"options\": [\"a. ...\", \"b. ...\"]}}."
    )
}

pub fn tutor(query: &str, tone: &str, basic_summary: &str, tracking_summary: &str) -> String {
    format!(
        "{query}\n\nExplain this in a {tone} tone.\n\
         About me: {}\n\
         My learning status: {}",
        or_placeholder(basic_summary),
        or_placeholder(tracking_summary),
    )
}

pub fn assess(topic: &str, basic_summary: &str) -> String {
    format!(
        "Evaluate my knowledge of {topic}. Background: {}\n\
         1. Give a very short point-wise summary of what I know, about the subject only.\n\
         2. Give a learning score, for example \"algebra - 20%\".\n\
         3. Give a quiz as JSON, each item shaped as \
         {{\"question\": \"...\", \"options\": [\"a. ...\", \"b. ...\"]}}. \
         Do not include the correct answers.",
        or_placeholder(basic_summary),
    )
}

pub fn tracking(assessment_lines: &str) -> String {
    format!(
        "Based on the following assessments, write a topic-wise tracking summary:\n\n\
         {assessment_lines}"
    )
}

pub fn guide(score_hint: &str, tracking_summary: &str, basic_summary: &str) -> String {
    format!(
        "{score_hint}\n\n\
         My learning scores and tracking summary: {}\n\
         About me: {}\n\
         Suggest the next learning path to improve my learning score.",
        or_placeholder(tracking_summary),
        or_placeholder(basic_summary),
    )
}

pub fn summary_update(existing: &str, new_data: &str) -> String {
    format!("Update the summary with new information: {existing}\nNew data: {new_data}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summaries_use_placeholder() {
        let p = dispatch("what is gravity?", "", "  ");
        assert_eq!(p.matches(NO_SUMMARY).count(), 2);
        assert!(p.contains("Query: what is gravity?"));
    }

    #[test]
    fn question_prompt_states_the_cap() {
        let p = discover_questions("Likes chemistry", 3);
        assert!(p.contains("at most 3 questions"));
        assert!(p.contains("Likes chemistry"));
    }

    #[test]
    fn tutor_prompt_names_tone() {
        let p = tutor("Explain osmosis", "dramatic", "Grade 7", "");
        assert!(p.contains("dramatic tone"));
        assert!(p.contains(NO_SUMMARY));
    }
}
