// All LLM prompt constants for the JD module.
// Templates use `{placeholder}` markers that are replaced before sending.

/// JD classification prompt template. Replace `{text}` before sending.
pub const JD_CLASSIFY_PROMPT_TEMPLATE: &str = r#"You are a recruiter who can recognise the job description (JD) of a job.
You are given a block of text and have to decide whether it is a JD or not.
Analyse the text and respond in one of the formats below.

Text:
{text}

Response format:

YES:
{
  "isJD": true,
  "reason": ""
}

NO:
{
  "isJD": false,
  "reason": "<Reason why it is not a JD>"
}"#;

/// Instruction sent to the browser agent before extraction.
pub const DISMISS_DIALOG_INSTRUCTION: &str =
    "If any popup / modal / dialog is found on the screen, strictly close it!";

/// Extraction instruction for the browser agent.
pub const JD_EXTRACT_INSTRUCTION: &str = r#"You are a smart machine that understands and extracts contents from webpages.
The current page should be the job description (JD) of a certain job.
It might not be: it can be a login page, a shopping cart or any other page.

Rules:
> If the webpage is not the JD of a job, report an error.
> Extract only the job description itself. Strictly do not extract unrelated content such as details about the company.

Strictly follow this JSON output format:

Success:
{
  "message": "SUCCESS",
  "data": "<Extracted content of the JD>"
}

Error:
{
  "message": "ERROR",
  "data": "<Error message>"
}

Put the error reason in `data`, e.g. UNKNOWN PAGE, DIFFICULT TO REACH, BLOCKERS CAME UP."#;

/// Candidate scoring prompt template. Replace `{jd}` before sending.
/// The résumé itself is sent as a file part ahead of this text.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"You are an ATS machine that judges candidates against the job descriptions (JDs) provided to you.
Below is the JD of the job.

{jd}

Using the JD above and the attached file, do the following:

> Analyse the candidate resume given as an input.
> Check whether the candidate is fit for the job.
> Rate the candidate using the structure below.

Score bands: score < 40 = POOR, 40 to 70 = AVERAGE, 70 to 90 = GOOD, above 90 = GREAT.

{
  "score": 82,
  "matching_skills": ["React", "Redux"],
  "missing_skills": ["Microfrontend", "PWA"],
  "explanation": "..."
}

- score: rating out of 100 based on how well the resume matches the JD.
- matching_skills: skills found on both the resume and the JD. Leave empty if none.
- missing_skills: skills the candidate lacks that keep them from standing out. Leave empty if none.
- explanation: two or three lines on why the candidate got this score, written as if you
  are talking to the candidate. For example: "Sayantan, you do have relevant skills but
  most of the AWS stack is missing. I would not recommend applying with this CV. Try a
  different one.""#;
