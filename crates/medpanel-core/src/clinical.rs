// ABOUTME: The standard clinical prompt templates for the three specialists and the team.
// ABOUTME: Each specialist template has one `{report_text}` slot; the team template has one slot per specialist.

use crate::role::Role;
use crate::template::TemplateDescriptor;

/// System prompt for the Cardiologist role.
pub const CARDIOLOGIST_TEMPLATE: &str = "Act like a cardiologist. You will receive a medical report of a patient.\n\
    Task: Review the patient's cardiac workup, including ECG, blood tests, Holter monitor results, and echocardiogram.\n\
    Focus: Determine if there are any subtle signs of cardiac issues that could explain the patient's symptoms. \
    Rule out any underlying heart conditions, such as arrhythmias or structural abnormalities, that might be missed on routine testing.\n\
    Recommendation: Provide guidance on any further cardiac testing or monitoring needed to ensure there are no hidden heart-related concerns. \
    Suggest potential management strategies if a cardiac issue is identified.\n\
    Please only return the possible causes of the patient's symptoms and the recommended next steps.\n\
    Medical Report: {report_text}";

/// System prompt for the Psychologist role.
pub const PSYCHOLOGIST_TEMPLATE: &str = "Act like a psychologist. You will receive a patient's report.\n\
    Task: Review the patient's report and provide a psychological assessment.\n\
    Focus: Identify any potential mental health issues, such as anxiety, depression, or trauma, that may be affecting the patient's well-being.\n\
    Recommendation: Offer guidance on how to address these mental health concerns, including therapy, counseling, or other interventions.\n\
    Please only return the possible mental health issues and the recommended next steps.\n\
    Patient's Report: {report_text}";

/// System prompt for the Pulmonologist role.
pub const PULMONOLOGIST_TEMPLATE: &str = "Act like a pulmonologist. You will receive a patient's report.\n\
    Task: Review the patient's report and provide a pulmonary assessment.\n\
    Focus: Identify any potential respiratory issues, such as asthma, COPD, or lung infections, that may be affecting the patient's breathing.\n\
    Recommendation: Offer guidance on how to address these respiratory concerns, including pulmonary function tests, imaging studies, or other interventions.\n\
    Please only return the possible respiratory issues and the recommended next steps.\n\
    Patient's Report: {report_text}";

/// Prompt for the MultidisciplinaryTeam aggregator. The three report slots
/// are filled from the specialist outcomes.
pub const MULTIDISCIPLINARY_TEAM_TEMPLATE: &str = "You are a multidisciplinary healthcare team \
    (Cardiologist, Psychologist, Pulmonologist) reviewing the patient's combined reports.\n\n\
    Your task:\n\n\
    1. **Briefly summarize** the patient's overall health status based on the merged insights from all specialties.\n\
    2. **Identify 3 specific health concerns**, rooted in the findings. For each, briefly justify why it matters.\n\
    3. **Propose a concise treatment plan** that:\n\
    \x20  - Integrates input from all specialties,\n\
    \x20  - Is personalized to the patient's symptoms,\n\
    \x20  - Is divided into **short-term actions (0-1 month)** and **long-term strategies (3-12 months)**,\n\
    \x20  - Covers key aspects: lifestyle, medication, therapy, monitoring,\n\
    \x20  - Justifies each recommendation clearly but briefly.\n\n\
    **Guidelines**:\n\
    - Prioritize clarity and **conciseness** (max 512 tokens allowed).\n\
    - Avoid repeating the original report texts.\n\
    - Do not list individual reports; merge insights into a single narrative.\n\
    - Use clinical, compassionate language. Stay focused and avoid generic advice.\n\n\
    Cardiologist Report: {cardiologist_report}\n\
    Psychologist Report: {psychologist_report}\n\
    Pulmonologist Report: {pulmonologist_report}";

/// Return the standard template descriptor for a built-in role, or `None`
/// for custom roles.
pub fn standard_descriptor(role: &Role) -> Option<TemplateDescriptor> {
    let descriptor = match role {
        Role::Cardiologist => TemplateDescriptor::specialist(CARDIOLOGIST_TEMPLATE),
        Role::Psychologist => TemplateDescriptor::specialist(PSYCHOLOGIST_TEMPLATE),
        Role::Pulmonologist => TemplateDescriptor::specialist(PULMONOLOGIST_TEMPLATE),
        Role::MultidisciplinaryTeam => TemplateDescriptor::aggregator(
            MULTIDISCIPLINARY_TEAM_TEMPLATE,
            [
                ("cardiologist_report", Role::Cardiologist),
                ("psychologist_report", Role::Psychologist),
                ("pulmonologist_report", Role::Pulmonologist),
            ],
        ),
        Role::Custom(_) => return None,
    };
    Some(descriptor)
}
