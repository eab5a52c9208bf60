// Path: crates/types/src/exclude.rs

//! Exclusion filters over the single component that follows an Interest name.
//!
//! A filter is an ascending list of elements. Explicit components exclude
//! exactly themselves. Range elements (`Any`, `Bloom`) sit between two
//! components, or before the first / after the last, and exclude what falls
//! strictly inside that open range: everything for `Any`, members for `Bloom`.

use crate::name::Component;
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const MIN_LG_BITS: u8 = 6;
const MAX_LG_BITS: u8 = 16;
const BITS_PER_ELEMENT: usize = 10;
const DEFAULT_HASHES: u8 = 7;

/// A seeded, space-efficient probabilistic set of components.
///
/// Lookups can return false positives (at a rate governed by the bit count
/// and number of hashes), never false negatives. The seed makes the bit
/// positions of a given filter unpredictable to other filters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bloom {
    lg_bits: u8,
    n_hash: u8,
    seed: [u8; 4],
    bits: Vec<u8>,
}

impl Bloom {
    /// Sizes a filter for roughly `expected` members at about a 1% false positive rate.
    pub fn with_capacity(expected: usize, seed: [u8; 4]) -> Self {
        let wanted = expected.max(1).saturating_mul(BITS_PER_ELEMENT);
        let mut lg_bits = MIN_LG_BITS;
        while lg_bits < MAX_LG_BITS && (1usize << lg_bits) < wanted {
            lg_bits += 1;
        }
        Self {
            lg_bits,
            n_hash: DEFAULT_HASHES,
            seed,
            bits: vec![0; 1usize << (lg_bits - 3)],
        }
    }

    /// Adds a component.
    pub fn insert(&mut self, component: &Component) {
        for bit in self.positions(component) {
            if let Some(byte) = self.bits.get_mut(bit >> 3) {
                *byte |= 1 << (bit & 7);
            }
        }
    }

    /// Membership test. May report false positives.
    pub fn contains(&self, component: &Component) -> bool {
        self.positions(component).all(|bit| {
            self.bits
                .get(bit >> 3)
                .is_some_and(|byte| byte & (1 << (bit & 7)) != 0)
        })
    }

    fn positions(&self, component: &Component) -> impl Iterator<Item = usize> {
        let mut h = FNV_OFFSET;
        for byte in self.seed.iter().chain(component.as_bytes()) {
            h ^= u64::from(*byte);
            h = h.wrapping_mul(FNV_PRIME);
        }
        let h1 = h as u32;
        let h2 = ((h >> 32) as u32) | 1;
        let mask = (1u32 << self.lg_bits) - 1;
        (0..u32::from(self.n_hash)).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) & mask) as usize)
    }
}

/// One element of an [`ExcludeFilter`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExcludeElement {
    /// Excludes exactly this component.
    Component(Component),
    /// Excludes every component in the surrounding open range.
    Any,
    /// Excludes members of the Bloom filter within the surrounding open range.
    Bloom(Bloom),
}

impl ExcludeElement {
    fn range_contains(&self, component: &Component) -> bool {
        match self {
            ExcludeElement::Component(_) => false,
            ExcludeElement::Any => true,
            ExcludeElement::Bloom(bloom) => bloom.contains(component),
        }
    }
}

/// An ordered exclusion filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludeFilter {
    elements: Vec<ExcludeElement>,
}

impl ExcludeFilter {
    /// Wraps a list of elements. Component elements are expected in ascending order;
    /// see [`ExcludeFilter::is_well_formed`].
    pub fn new(elements: Vec<ExcludeElement>) -> Self {
        Self { elements }
    }

    /// A filter excluding exactly the given components.
    pub fn from_components(components: impl IntoIterator<Item = Component>) -> Self {
        let mut sorted: Vec<Component> = components.into_iter().collect();
        sorted.sort();
        sorted.dedup();
        Self {
            elements: sorted.into_iter().map(ExcludeElement::Component).collect(),
        }
    }

    /// A filter excluding every component up to and including `bound`.
    pub fn any_up_to(bound: Component) -> Self {
        Self {
            elements: vec![ExcludeElement::Any, ExcludeElement::Component(bound)],
        }
    }

    /// The filter's elements.
    pub fn elements(&self) -> &[ExcludeElement] {
        &self.elements
    }

    /// True if component elements appear in strictly ascending order.
    pub fn is_well_formed(&self) -> bool {
        let mut last: Option<&Component> = None;
        for element in &self.elements {
            if let ExcludeElement::Component(c) = element {
                if last.is_some_and(|prev| prev >= c) {
                    return false;
                }
                last = Some(c);
            }
        }
        true
    }

    /// True if `component` is excluded.
    pub fn matches(&self, component: &Component) -> bool {
        let mut pending: Vec<&ExcludeElement> = Vec::new();
        for element in &self.elements {
            match element {
                ExcludeElement::Component(bound) => match component.cmp(bound) {
                    std::cmp::Ordering::Equal => return true,
                    std::cmp::Ordering::Less => {
                        return pending.iter().any(|p| p.range_contains(component))
                    }
                    std::cmp::Ordering::Greater => pending.clear(),
                },
                range => pending.push(range),
            }
        }
        pending.iter().any(|p| p.range_contains(component))
    }

    /// If the filter opens with `Any, C`, every component `<= C` is excluded and
    /// `C` is returned so a search can skip straight past it.
    pub fn lower_bound(&self) -> Option<&Component> {
        match self.elements.as_slice() {
            [ExcludeElement::Any, ExcludeElement::Component(bound), ..] => Some(bound),
            _ => None,
        }
    }
}
