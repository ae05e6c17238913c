//! Lens catalogue and template generation.
//!
//! A lens is a pre-templated markdown rendering of a document. Content is
//! generated from the document title only; once a user edits a lens the
//! edited text is stored on the document and takes precedence.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::models::Document;

/// The lens kinds a document can be viewed through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensKind {
    #[default]
    Slide,
    Study,
    Story,
    Scholar,
    Speed,
    Faq,
}

impl LensKind {
    /// Every kind, in catalogue order.
    pub const ALL: [LensKind; 6] = [
        LensKind::Slide,
        LensKind::Study,
        LensKind::Story,
        LensKind::Scholar,
        LensKind::Speed,
        LensKind::Faq,
    ];

    /// Parse a lens kind from a string (case-insensitive).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slide" => Some(LensKind::Slide),
            "study" => Some(LensKind::Study),
            "story" => Some(LensKind::Story),
            "scholar" => Some(LensKind::Scholar),
            "speed" => Some(LensKind::Speed),
            "faq" => Some(LensKind::Faq),
            _ => None,
        }
    }
}

impl fmt::Display for LensKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LensKind::Slide => "slide",
            LensKind::Study => "study",
            LensKind::Story => "story",
            LensKind::Scholar => "scholar",
            LensKind::Speed => "speed",
            LensKind::Faq => "faq",
        };
        f.write_str(name)
    }
}

/// Whether a lens can currently be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensStatus {
    Available,
    Generating,
    Locked,
}

/// Catalogue entry describing a lens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensDefinition {
    pub kind: LensKind,
    pub name: String,
    pub description: String,
    /// Icon identifier understood by the front-end.
    pub icon: String,
    pub status: LensStatus,
    /// Release phase; only phase 1 lenses are available today.
    pub phase: u8,
}

/// Look up the catalogue entry for a lens kind.
pub fn definition(kind: LensKind) -> LensDefinition {
    let (name, description, icon, status, phase) = match kind {
        LensKind::Slide => (
            "Lecture Slides",
            "Key points in presentation format",
            "Presentation",
            LensStatus::Available,
            1,
        ),
        LensKind::Study => (
            "Detailed Notes",
            "In-depth study guide with examples",
            "BookOpen",
            LensStatus::Available,
            1,
        ),
        LensKind::Story => (
            "Economist Article",
            "Narrative magazine-style format",
            "Newspaper",
            LensStatus::Available,
            1,
        ),
        LensKind::Scholar => (
            "Academic Outline",
            "Formal academic structure",
            "GraduationCap",
            LensStatus::Locked,
            2,
        ),
        LensKind::Speed => (
            "Quick Summary",
            "Executive summary format",
            "Zap",
            LensStatus::Locked,
            2,
        ),
        LensKind::Faq => (
            "FAQ Sheet",
            "Questions and answers format",
            "FileQuestion",
            LensStatus::Locked,
            2,
        ),
    };

    LensDefinition {
        kind,
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        status,
        phase,
    }
}

/// All lenses, including locked ones.
pub fn all_lenses() -> Vec<LensDefinition> {
    LensKind::ALL.iter().copied().map(definition).collect()
}

/// Lenses released in the current phase.
pub fn available_lenses() -> Vec<LensDefinition> {
    all_lenses().into_iter().filter(|l| l.phase == 1).collect()
}

pub fn is_lens_available(kind: LensKind) -> bool {
    definition(kind).status == LensStatus::Available
}

/// Generate the template markdown for a lens, keyed by the document title.
pub fn generate_lens_content(title: &str, kind: LensKind) -> String {
    let body = match kind {
        LensKind::Slide => SLIDE_TEMPLATE,
        LensKind::Study => STUDY_TEMPLATE,
        LensKind::Story => STORY_TEMPLATE,
        LensKind::Scholar | LensKind::Speed | LensKind::Faq => COMING_SOON_TEMPLATE,
    };
    format!("# {title}\n\n{body}")
}

/// Return the stored lens text for a document, generating it when absent.
pub fn lens_content(document: &Document, kind: LensKind) -> String {
    match document.lenses.get(kind) {
        Some(content) if !content.is_empty() => content.to_string(),
        _ => generate_lens_content(&document.title, kind),
    }
}

/// Replace one lens slot and bump the document's modification time.
pub fn update_lens_content(mut document: Document, kind: LensKind, content: String) -> Document {
    document.lenses.set(kind, content);
    document.updated_at = Utc::now();
    tracing::info!("Updated {} lens for document {}", kind, document.id);
    document
}

const SLIDE_TEMPLATE: &str = "## 📊 Slide Lens - Key Points

### Main Concepts
- **Core Concept 1**: Primary insight from the document
- **Core Concept 2**: Secondary important principle
- **Core Concept 3**: Practical application or implication

### Key Takeaways
- [ ] Review and understand concept 1
- [ ] Practice applying concept 2
- [ ] Explore further implications of concept 3

### Discussion Points
1. How do these concepts relate to existing knowledge?
2. What are the practical applications?
3. What questions remain unanswered?

---

*This slide view is optimized for presentation and quick reference. Use the formatting tools above to customize the content for your needs.*";

const STUDY_TEMPLATE: &str = "## 📚 Study Lens - Comprehensive Analysis

### Learning Objectives
After studying this document, you will understand:
1. **Primary concepts** and their foundational principles
2. **Practical applications** and real-world implementations
3. **Related terminology** and key vocabulary
4. **Critical thinking** approaches to the subject matter

### Detailed Analysis

#### Section 1: Introduction & Context
**Key Definition**: *[Add important term definitions here]*

**Background Information**: This section provides the historical context and foundational knowledge necessary to understand the main concepts.

#### Section 2: Core Principles
**Principle A**: Detailed explanation with supporting evidence and examples.
- Example 1: [Add specific example]
- Example 2: [Add another example]
- Related concepts: [List related ideas]

**Principle B**: Extended discussion with practical applications.
- Case study: [Add relevant case study]
- Implementation: [Describe how to apply]
- Common pitfalls: [List things to avoid]

### Study Questions
1. What are the fundamental principles discussed in this document?
2. How do these concepts apply in practical scenarios?
3. What are the strengths and limitations of the approaches presented?
4. How do these ideas connect to other concepts you've learned?

### Further Reading
- [Add relevant resources]
- [Add additional materials for deeper understanding]

---

*This study view is designed for comprehensive learning and retention. Add your own notes and examples using the editor above.*";

const STORY_TEMPLATE: &str = "## 📖 Story Lens - Narrative Exploration

### The Journey Begins

In a world where information flows like rivers converging into an ocean of knowledge, our story unfolds with a simple yet profound question: *How do we transform the way we understand and interact with complex ideas?*

### Setting the Scene

Picture yourself standing at the crossroads of traditional learning and innovative approaches. The document before you isn't just a collection of facts and figures. It's a gateway to a new way of seeing the world.

### The Characters

**The Concepts**: Like protagonists in our narrative, each main idea has its own personality and role to play. They interact, conflict, and ultimately work together to create a coherent understanding.

**The Reader**: You, the explorer, bringing your own experiences and perspectives to this intellectual journey.

**The Context**: The broader environment in which these ideas exist and evolve.

### The Plot Unfolds

#### Act I: Discovery
Our journey begins with the recognition that traditional approaches may not be sufficient for the challenges we face. There's a growing awareness that new perspectives are needed.

#### Act II: Exploration
As we delve deeper, we encounter various approaches and methodologies. Some prove more effective than others. We learn through trial, error, and gradual understanding.

#### Act III: Integration
Finally, the pieces begin to come together. We see how different elements connect and support each other, forming a coherent whole that's greater than the sum of its parts.

### The Resolution

What started as a simple exploration has become a transformation of our understanding and of our entire approach to learning and problem-solving.

### Epilogue: Looking Forward

The story doesn't end here. Like all good narratives, it opens up new questions and possibilities for future exploration.

---

*This narrative view transforms complex concepts into an engaging story format. Edit above to add your own perspective and insights.*";

const COMING_SOON_TEMPLATE: &str = "This lens is coming in Phase 2 of the development.

In the meantime, you can:
- Use the **Slide Lens** for key points and presentations
- Use the **Study Lens** for comprehensive learning materials
- Use the **Story Lens** for narrative-style exploration

Stay tuned for more lens types in future updates!";
