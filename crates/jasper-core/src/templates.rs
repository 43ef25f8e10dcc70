//! Fixed, editorially reviewed answer bodies, keyed by intent.
//!
//! Templated intents answer from this table rather than from retrieved
//! document text; retrieval only gates whether an answer is given at
//! all. Kept out of the synthesis control flow so the copy can be
//! edited or localized without touching code paths.

use crate::types::Intent;

/// Returned when no internal or external source backs the query.
pub const NO_SOURCES_RESPONSE: &str = "I'm sorry, I don't have enough information to answer \
     that question at the moment. Could you try rephrasing or asking about a different legal topic?";

/// Returned when the pipeline hits an unexpected internal error.
pub const ERROR_RESPONSE: &str = "I'm sorry, I'm having difficulty processing your query \
     right now. Please try again later.";

/// Closing line appended to extractive (untemplated) answers.
pub const FOLLOW_UP_PROMPT: &str =
    "<p>Is there anything specific you'd like to know more about?</p>";

const ARREST_RIGHTS: &str = "\
<h3>Your Rights When Arrested in India</h3>\n\
<p>Based on Indian law, particularly Article 22 of the Constitution and the Criminal \
Procedure Code, you have the following rights when arrested:</p>\n\
<ul>\n\
  <li>Right to know the grounds of arrest</li>\n\
  <li>Right to legal representation</li>\n\
  <li>Right to be produced before a magistrate within 24 hours</li>\n\
  <li>Right against self-incrimination</li>\n\
  <li>Right to inform a relative or friend about the arrest</li>\n\
</ul>\n\
<p>The police must follow the guidelines set by the Supreme Court in the D.K. Basu case.</p>";

const FIR_FILING: &str = "\
<h3>How to File an FIR in India</h3>\n\
<p>Here's the process for filing a First Information Report (FIR):</p>\n\
<ol>\n\
  <li>Visit the police station that has jurisdiction over the area where the incident occurred</li>\n\
  <li>Provide all relevant details to the officer in charge</li>\n\
  <li>The officer will record your statement and prepare the FIR</li>\n\
  <li>Review the FIR before signing it</li>\n\
  <li>Obtain a free copy of the FIR (this is your right)</li>\n\
</ol>\n\
<p>If the police refuse to file your FIR, you can approach a higher officer, send a written \
complaint to the Superintendent of Police, or approach a magistrate under Section 156(3) \
of the CrPC.</p>";

const PROPERTY_REGISTRATION: &str = "\
<h3>Property Registration Process in India</h3>\n\
<p>The property registration process typically involves these steps:</p>\n\
<ol>\n\
  <li>Draft and review the sale deed with legal assistance</li>\n\
  <li>Pay stamp duty (which varies by state)</li>\n\
  <li>Schedule an appointment with the Sub-Registrar's office</li>\n\
  <li>Submit the documents along with ID proof, property papers, and photographs</li>\n\
  <li>Complete biometric verification</li>\n\
  <li>Pay registration fee (typically 1% of property value)</li>\n\
  <li>Collect the registered document</li>\n\
</ol>\n\
<p>Required documents typically include the sale deed, previous title deeds, tax receipts, \
and ID proofs.</p>";

const CONSUMER_COMPLAINT: &str = "\
<h3>Filing a Consumer Complaint in India</h3>\n\
<p>Under the Consumer Protection Act, 2019, you can file a complaint through these steps:</p>\n\
<ol>\n\
  <li>Write a formal complaint to the business/service provider</li>\n\
  <li>Gather evidence including bills, warranty cards, and correspondence</li>\n\
  <li>Choose the appropriate forum based on claim amount:\n\
    <ul>\n\
      <li>District Commission (up to ₹1 crore)</li>\n\
      <li>State Commission (₹1 crore to ₹10 crores)</li>\n\
      <li>National Commission (above ₹10 crores)</li>\n\
    </ul>\n\
  </li>\n\
  <li>Submit your complaint with necessary documents and fee</li>\n\
  <li>Alternatively, file online through the NCDRC website</li>\n\
</ol>\n\
<p>The complaint must be filed within 2 years from the date of cause of action.</p>";

const LEGAL_AID: &str = "\
<h3>Legal Aid in India</h3>\n\
<p>Legal Services Authorities provide free legal aid to eligible individuals:</p>\n\
<ul>\n\
  <li>Women and children</li>\n\
  <li>Members of Scheduled Castes/Scheduled Tribes</li>\n\
  <li>Victims of disasters, trafficking, or disabilities</li>\n\
  <li>Industrial workmen</li>\n\
  <li>Persons in custody</li>\n\
  <li>Those with annual income below specified limits</li>\n\
</ul>\n\
<p>You can approach the nearest Legal Services Authority, legal aid clinic, or Lok Adalat. \
Contact the National Legal Services Authority (NALSA) for more information.</p>";

/// Fixed answer body for an intent, or `None` for intents answered by
/// extractive summarization.
pub fn template_for(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::ArrestRights => Some(ARREST_RIGHTS),
        Intent::FirFiling => Some(FIR_FILING),
        Intent::PropertyRegistration => Some(PROPERTY_REGISTRATION),
        Intent::ConsumerComplaint => Some(CONSUMER_COMPLAINT),
        Intent::LegalAid => Some(LEGAL_AID),
        Intent::GeneralInfo => None,
    }
}
