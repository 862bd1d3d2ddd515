//! # Stillframe
//!
//! Asset build pipeline for static photography portfolios. Your filesystem
//! is the data source: every subdirectory of the source root is a gallery,
//! every image inside it is one photograph, and the build turns that tree
//! into the responsive WebP asset tree plus per-gallery manifests that the
//! browser viewer consumes.
//!
//! # Architecture: One Pass, Incremental
//!
//! ```text
//! gallery/bw/pier.jpg  ──►  web/public/assets/gallery/bw/thumb/pier.webp
//!                           web/public/assets/gallery/bw/medium/pier.webp
//!                           web/public/assets/gallery/bw/full/pier.webp
//!                           web/public/assets/gallery/bw/manifest.json
//! ```
//!
//! A run walks the galleries in order and, per gallery, pushes every source
//! image through a bounded worker pool. Each job decides its own fate: the
//! incremental gate compares filesystem mtimes and skips images whose
//! outputs are already current; stale images are decoded once, flattened to
//! RGB, resized per size class (never upscaled), and re-encoded. The
//! manifest is rewritten after the pool drains, orphaned outputs are
//! reconciled away, and the site configuration's gallery list is merged
//! without touching operator-owned fields.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Gallery and source-image enumeration |
//! | [`gate`] | Incremental mtime gate (`--force` bypass) |
//! | [`imaging`] | Decode → flatten → Lanczos3 resize → lossy WebP encode |
//! | [`pool`] | Bounded worker pool with streamed completion |
//! | [`manifest`] | Per-gallery `manifest.json` for the viewer |
//! | [`reconcile`] | Orphaned output files and gallery directories |
//! | [`siteconfig`] | Read-merge-write of the shared `site.json` |
//! | [`pipeline`] | Orchestration, events, run summary |
//! | [`settings`] | Size-class table and encode quality |
//! | [`output`] | CLI output formatting (pure format fns) |
//! | [`fsutil`] | Temp-then-rename atomic publishing |
//!
//! # Design Decisions
//!
//! ## WebP-Only Output
//!
//! All generated variants are lossy WebP at one fixed quality. A single
//! modern format keeps the output tree and the viewer's `<img>` wiring
//! trivial; format negotiation is explicitly out of scope.
//!
//! ## Mtime Gate, Not Content Hashing
//!
//! Incremental rebuilds compare modification times — a handful of `stat`
//! calls per image. The known tradeoffs (a `touch` re-encodes, a restored
//! backup with an old mtime may be wrongly skipped) are documented in
//! [`gate`] rather than papered over with hashing, which would change the
//! cost profile of every no-op rebuild.
//!
//! ## Explicit Worker Pool
//!
//! Encoding is the only parallel part, and it is parallelized with a
//! visible mechanism: a locked job queue, N scoped worker threads, and an
//! mpsc result channel. Bounded parallelism, per-job failure isolation,
//! and streamed completion are all directly readable in [`pool`] instead
//! of delegated to an executor abstraction.
//!
//! ## Shared Config, Owned Section
//!
//! `site.json` is edited by the operator and by this pipeline. The
//! pipeline types only the fields it owns (gallery ids, display names,
//! order) and round-trips everything else — including key order — through
//! untyped maps, so viewer-side config can evolve without rebuilding this
//! crate.

pub mod discover;
pub mod fsutil;
pub mod gate;
pub mod imaging;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod reconcile;
pub mod settings;
pub mod siteconfig;
