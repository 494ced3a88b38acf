//! `padhai register` — Create a student profile from the terminal.

use padhai_core::profile::StudentIdentity;

pub async fn run(
    name: String,
    standard: String,
    subject: String,
    like_study: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let orchestrator = super::build_orchestrator(&config).await?;

    let registration = orchestrator
        .register(StudentIdentity {
            name,
            standard,
            subject,
            like_study,
        })
        .await?;

    println!("Student ID: {}", registration.student_id);
    println!();
    println!("{}", registration.basic_summary);

    Ok(())
}
