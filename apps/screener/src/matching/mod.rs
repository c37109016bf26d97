// Scoring core: text embeddings, cosine similarity, weighted section scores,
// and the stable ranking over candidates. Everything here is synchronous;
// callers on the async side run it on a blocking worker.

pub mod bert;
pub mod embedder;
pub mod ranking;
pub mod similarity;
