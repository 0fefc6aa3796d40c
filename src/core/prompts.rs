//! Prompt templates
//!
//! Pure string substitution, no logic. `{placeholder}` markers are replaced
//! verbatim; the templates contain no other braces.

const COT_GENERATION: &str = r#"You are a professional aviation accident investigator, familiar with the standard analytical style used by the NTSB (National Transportation Safety Board).

[Task Description]
I will provide two sections of content:

1. **[Accident Narrative]** – a description of the accident sequence;
2. **[Official Conclusion]** – the already determined probable cause(s) and contributing factors of the accident;

Your task is:
Only generate the **"intermediate reasoning process (Chain-of-Thought)"** that step-by-step connects the **[Accident Narrative]** to the types of causes represented in the **[Official Conclusion]**.

[Writing and Reasoning Rules]

1. Output only the body of the reasoning chain. Do **not** output any titles, introductions, or concluding phrases (such as "In summary" or "In conclusion").
2. The reasoning chain must be **step-numbered** (1, 2, 3, …), with a clear structure, and each step should express only **one** key reasoning point.
3. The reasoning content must:

   * Come directly from information explicitly mentioned in the **[Accident Narrative]**, or
   * Be a direct and reasonable inference based on that information (such as time sequence or causal relationships).
     You must **not** introduce any facts that are completely absent from the narrative.
4. The reasoning should reflect professional aviation accident analysis logic, including but not limited to:

   * Clearly identifying the **phase of flight** (e.g., taxi, takeoff, climb, cruise, descent, approach, landing, go-around, etc.);
   * Identifying key abnormal events (e.g., power loss, control anomalies, stall indications, runway excursion, etc.);
   * Analyzing the pilot's actions and their possible effects (manipulation of controls, decision-making, crew/resource management, etc.);
   * Using evidence-based reasoning to **retain or rule out** common factors (such as weather, fuel, mechanical failure, operational error, etc.),
     and relying as much as possible on **evidence-based exclusion/retention** rather than subjective speculation;
   * Making the causal chain explicit (initial event → change in aircraft/operational state or environment → pilot response → subsequent event/loss of control → final outcome).
5. You must **not fabricate** the following information:

   * Specific meteorological conditions (e.g., exact visibility, cloud base, wind direction/speed values, etc.);
   * Specific instrument readings (e.g., precise airspeed, altitude, rpm, fuel quantity values, etc.);
   * Specific maintenance history, company policies, or modification status of the aircraft type;
   * Any dialogue, checklist items, cabin conditions, etc. that are not present in the narrative.
6. The reasoning chain should **naturally lead** toward the categories of causes stated in the **[Official Conclusion]**:

   * You may use expressions such as "this suggests that…", "it can be inferred that…", "this is consistent with events of the … type", etc.,
   * But you must **not** directly repeat or provide an equivalent rephrasing of the original wording of the **[Official Conclusion]**.
7. The tone must be professional, objective, and evidence-based:

   * Avoid emotional or accusatory language;
   * Avoid absolute statements such as "it must be" or "it definitely is";
   * Prefer expressions like "it is more likely that…", "this is consistent with…", "there is insufficient evidence to support the hypothesis that…", etc.

[Output Format]
Strictly follow the format below, and do not add any extra explanations:

1. …
2. …
3. …

—— Content to be analyzed ——

[Accident Narrative]
{narrative}

[Official Conclusion]
{official_cause}

Please produce the reasoning chain strictly according to the above rules:
"#;

const RESPONSE_GENERATION: &str = r#"You are a professional aviation accident investigator with analytical capabilities comparable to those of the NTSB (National Transportation Safety Board).

**Task:**
I will provide an *accident narrative*.
Based on the known facts in the narrative, directly provide the *cause of the accident*.

**Output requirements:**
* Output *only* the accident cause itself
* Analysis must be concise, professional, and evidence-based
* Do not add explanations or extra words
* Do not speculate
* Do not include phrases like "the cause is"

**Accident narrative:**
{content}
"#;

const FAITHFULNESS: &str = r#"You are an aviation accident investigation expert, and you are now to assess whether a chain of thought is faithful to the accident narrative.

**Accident Narrative**
{narrative}

**Chain of Thought**
{cot}

Please determine whether the chain of thought is strictly based on the narrative, without inventing or adding specific facts that are not present in the narrative.

**Scoring Criteria:**
1 point: A large amount of content does not match the narrative; clear fabrication.
2 points: Considerable fabrication or contradictions.
3 points: Basically based on the narrative, but contains minor expansions or unreasonable inferences.
4 points: Mostly faithful to the narrative, with only slight reasonable inferences.
5 points: Completely faithful to the narrative, with no fabrication whatsoever.

Please output only a number from 1 to 5. Do not output explanations or any other content, and do not repeat the chain of thought.
"#;

const LOGICALITY: &str = r#"You are an aviation accident causal-analysis expert, and you need to evaluate the causal logic of a chain of thought.

**Accident Narrative**
{narrative}

**Chain of Thought**
{cot}

Please determine whether the chain of thought follows a reasonable causal sequence:

* Flight phase → Abnormal event → Pilot actions → Environmental exclusion → Inspection results → Accident chain

**Scoring Criteria:**
1 point: Chaotic reasoning with no causal relationships.
2 points: Multiple leaps in logic; weak causal connections.
3 points: Partial causal chain, but incomplete or not rigorous.
4 points: Logical and complete, with only minor leaps.
5 points: Highly rigorous, coherent, and professional causal chain.

Please output only a number from 1 to 5. Do not output explanations or any other content, and do not repeat the chain of thought.
"#;

const SUPPORT: &str = r#"You are an aviation accident assessment expert, and you must determine whether a chain of thought can reasonably support the official final cause.

**Accident Narrative**
{narrative}

**Chain of Thought**
{cot}

**Official Conclusion**
{cause}

Please evaluate: Based solely on this chain of thought, would you be convinced that the official cause is correct?

**Scoring Criteria:**
1 point: Does not support the conclusion at all, even contradicts it.
2 points: Insufficient support.
3 points: Some steps support the conclusion, but the chain is not complete.
4 points: Basically supports the conclusion, with minor gaps.
5 points: Fully and sufficiently supports the official cause.

Please output only a number from 1 to 5. Do not output explanations or any other content, and do not repeat the chain of thought.
"#;

const COMPLETENESS: &str = r#"You are an aviation accident reasoning-chain reviewer and need to evaluate whether the chain of thought covers the key elements of the narrative.

**Accident Narrative**
{narrative}

**Chain of Thought**
{cot}

Please check whether it includes:

* Flight phase (Phase)
* Abnormal event (Anomaly)
* Pilot action (Pilot action)
* Environmental factors (Weather)
* Mechanical/system exclusion (Mechanical)
* Causal chain description (Causal chain)

**Scoring Rules:**
1 point: Extremely incomplete, only repeats the narrative.
2 points: Missing several important elements.
3 points: Covers some but not all elements.
4 points: Covers most key content.
5 points: Fully covers all key elements.

Please output only a number from 1 to 5. Do not output explanations or any other content, and do not repeat the chain of thought.
"#;

const NTSB_STYLE: &str = r#"You are an investigator familiar with NTSB writing style. Please determine whether the chain of thought conforms to NTSB standards:

**NTSB Style Characteristics**

* Objective and fact-based
* No emotional wording
* No subjective speculation (e.g., "I think," "it seems")
* Uses formal terminology (e.g., "the pilot reported...")
* Clear structure
* No invention of background information not provided

**Chain of Thought**
{cot}

**Scoring Rules:**
1 point: Not like NTSB at all; contains obvious subjectivity and emotional content.
2 points: Partially similar, but with clear inconsistencies.
3 points: Generally consistent, but with minor stylistic deviations.
4 points: Largely consistent, with only slight differences.
5 points: Fully consistent with NTSB style.

Please output only a number from 1 to 5. Do not output explanations or other information.
"#;

const CAUSAL_ACCURACY: &str = r#"You are an aviation safety expert. Evaluate whether the Generated Answer correctly identifies the true causal factors supported by the accident narrative.

**Accident Narrative**
{narrative}

**Generated Answer**
{answer}

**Official Conclusion**
{cause}

Your task is to determine whether the Generated Answer accurately reflects the core causal factors described in the narrative.
Do NOT compare wording. Focus strictly on whether the causal explanation matches the facts presented in the narrative.

**Scoring Criteria (1–5):**
1 point: Identifies a cause contradicted by the narrative.
2 points: Mentions a factor from the narrative but misses the primary causal element.
3 points: Captures part of the causal relationship but misses key components.
4 points: Mostly accurate; identifies the main narrative-supported cause.
5 points: Fully accurate; clearly reflects the primary cause supported by the narrative.

Output only a number from 1 to 5.
"#;

const CAUSAL_COMPLETENESS: &str = r#"You are an aviation safety expert. Evaluate whether the Generated Answer includes all
**essential causal elements** necessary to convey the core cause of the accident.

The Generated Answer may be brief and does NOT need to include every minor contributing factor.
Do not penalize for concise wording.
Your task is to check whether the answer covers all **major causal components that are essential for understanding the main causal mechanism** of the accident.

**Accident Narrative**
{narrative}

**Generated Answer**
{answer}

**Official Conclusion**
{cause}

**Scoring Criteria (1–5):**
1 point: Misses all essential causal elements; does not reflect the narrative.
2 points: Mentions only a small part of the essential cause; incomplete.
3 points: Captures the main cause but omits one or more important essential elements.
4 points: Covers the primary cause and almost all essential elements, with minor omissions.
5 points: Fully complete for a brief summary; includes all major essential causal elements needed to understand the core causal chain.

Output only a number from 1 to 5.
"#;

const CAUSAL_PRECISION: &str = r#"You are an aviation safety expert. Evaluate whether the Generated Answer avoids introducing any causal claims not supported by the narrative.

**Accident Narrative**
{narrative}

**Generated Answer**
{answer}

Determine whether the Generated Answer strictly adheres to the narrative facts and does not invent unsupported causes (e.g., mechanical failures, weather issues, pilot actions, or procedural factors not mentioned).

**Scoring Criteria (1–5):**
1 point: Contains major fabricated or contradictory causes.
2 points: Includes multiple unsupported assumptions or invented details.
3 points: Mostly grounded but includes one or two minor unsupported elements.
4 points: Very precise; no major unsupported claims.
5 points: Perfect precision; all causal statements are directly supported by the narrative with zero fabrication.

Output only a number from 1 to 5.
"#;

const CAUSE_ALIGNMENT: &str = r#"You are an aviation safety expert. Evaluate whether the Generated Answer is consistent with the Official Probable Cause while still being supported by the facts presented in the accident narrative.

The Generated Answer does NOT need to match the wording of the official cause.
It may include additional detail or context from the narrative, as long as it does not contradict the official cause.
Your task is to judge whether the Generated Answer is aligned with the intent and meaning of the official cause and compatible with the narrative facts.

**Accident Narrative**
{narrative}

**Official Probable Cause**
{cause}

**Generated Answer**
{answer}

**Scoring Criteria (1–5):**
1 point: Contradicts the official cause or narrative facts.
2 points: Mentions a related factor but conflicts with the official cause or misses its key intent.
3 points: Partially aligned; captures part of the official cause but misses important meaning.
4 points: Mostly aligned; consistent with the official cause and narrative, with minor differences.
5 points: Fully aligned; meaningfully consistent with the official cause and fully compatible with the narrative.

Output only a number from 1 to 5.
"#;

pub fn cot_generation(narrative: &str, official_cause: &str) -> String {
    COT_GENERATION
        .replace("{narrative}", narrative)
        .replace("{official_cause}", official_cause)
}

pub fn response_generation(content: &str) -> String {
    RESPONSE_GENERATION.replace("{content}", content)
}

pub fn faithfulness(narrative: &str, cot: &str) -> String {
    FAITHFULNESS
        .replace("{narrative}", narrative)
        .replace("{cot}", cot)
}

pub fn logicality(narrative: &str, cot: &str) -> String {
    LOGICALITY
        .replace("{narrative}", narrative)
        .replace("{cot}", cot)
}

pub fn support(narrative: &str, cot: &str, cause: &str) -> String {
    SUPPORT
        .replace("{narrative}", narrative)
        .replace("{cot}", cot)
        .replace("{cause}", cause)
}

pub fn completeness(narrative: &str, cot: &str) -> String {
    COMPLETENESS
        .replace("{narrative}", narrative)
        .replace("{cot}", cot)
}

pub fn ntsb_style(cot: &str) -> String {
    NTSB_STYLE.replace("{cot}", cot)
}

pub fn causal_accuracy(narrative: &str, answer: &str, cause: &str) -> String {
    CAUSAL_ACCURACY
        .replace("{narrative}", narrative)
        .replace("{answer}", answer)
        .replace("{cause}", cause)
}

pub fn causal_completeness(narrative: &str, answer: &str, cause: &str) -> String {
    CAUSAL_COMPLETENESS
        .replace("{narrative}", narrative)
        .replace("{answer}", answer)
        .replace("{cause}", cause)
}

pub fn causal_precision(narrative: &str, answer: &str) -> String {
    CAUSAL_PRECISION
        .replace("{narrative}", narrative)
        .replace("{answer}", answer)
}

pub fn cause_alignment(narrative: &str, answer: &str, cause: &str) -> String {
    CAUSE_ALIGNMENT
        .replace("{narrative}", narrative)
        .replace("{cause}", cause)
        .replace("{answer}", answer)
}
