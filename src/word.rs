//! The immutable seven-attribute record at the heart of the store.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::number::Number;

/// A word: either a vocabulary definition or an asserted sentence.
///
/// All seven attributes are assigned once at creation. It's intentional to
/// encapsulate them in the struct and only expose them through getters,
/// because this yields true immutability for words after creation;
/// corrections are made by asserting new words, never by editing old ones.
#[derive(Debug, Eq)]
pub struct Word {
    idn: Number,
    sbj: Number,
    vrb: Number,
    obj: Number,
    num: Number,
    txt: String,
    whn: Number,
}

impl Word {
    pub fn new(
        idn: Number,
        sbj: Number,
        vrb: Number,
        obj: Number,
        num: Number,
        txt: String,
        whn: Number,
    ) -> Self {
        Self {
            idn,
            sbj,
            vrb,
            obj,
            num,
            txt,
            whn,
        }
    }
    pub fn idn(&self) -> &Number {
        &self.idn
    }
    pub fn sbj(&self) -> &Number {
        &self.sbj
    }
    pub fn vrb(&self) -> &Number {
        &self.vrb
    }
    pub fn obj(&self) -> &Number {
        &self.obj
    }
    pub fn num(&self) -> &Number {
        &self.num
    }
    pub fn txt(&self) -> &str {
        &self.txt
    }
    pub fn whn(&self) -> &Number {
        &self.whn
    }

    /// JSON view for host applications and diagnostics.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "idn": self.idn.to_json(),
            "sbj": self.sbj.to_json(),
            "vrb": self.vrb.to_json(),
            "obj": self.obj.to_json(),
            "num": self.num.to_json(),
            "txt": self.txt,
            "whn": self.whn.to_json(),
        })
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.idn == other.idn
    }
}
impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.idn.hash(state);
    }
}
impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} [{}, {}, {}] {} \"{}\" @{}",
            self.idn, self.sbj, self.vrb, self.obj, self.num, self.txt, self.whn
        )
    }
}
