// Resume ingestion: file bytes -> raw text -> structured ResumeRecord.
// Entity and POS labels come from the external annotation service; everything
// here is the rule layer on top of it.

pub mod annotator;
pub mod document;
pub mod information;
