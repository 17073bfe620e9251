//! Graph data as it comes over the wire: addresses, identities, pages and
//! the follow-list view built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, hash};

use crate::error::AddressError;

/// Lowercase-normalized `0x` address, the unique key of an identity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    const BODY_LENGTH: usize = 40;

    pub fn parse(input: impl AsRef<str>) -> Result<Self, AddressError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(trimmed.to_string()))?;

        if body.len() != Self::BODY_LENGTH {
            return Err(AddressError::InvalidLength(body.len()));
        }
        hex::decode(body).map_err(|_| AddressError::InvalidHex(trimmed.to_string()))?;

        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    #[must_use]
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcd`, as shown in compact list rows.
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

/// An address plus whatever profile data the query service attached to it.
///
/// Profile fields (`ens`, `avatar`, `domain`, ...) are opaque and passed
/// through unmodified. Equality and hashing only look at the address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    pub address: Address,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Identity {
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            profile: Map::new(),
        }
    }

    #[must_use]
    pub fn with_profile_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn ens(&self) -> Option<&str> {
        self.profile_str("ens")
    }

    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.profile_str("avatar")
    }

    /// ENS name when present, short address otherwise.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.ens()
            .filter(|name| !name.is_empty())
            .map_or_else(|| self.address.short(), str::to_string)
    }

    fn profile_str(&self, key: &str) -> Option<&str> {
        self.profile.get(key).and_then(Value::as_str)
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Identity {}

impl hash::Hash for Identity {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatus {
    /// The signed-in user follows the target.
    pub is_following: bool,
    /// The target follows the signed-in user.
    #[serde(default)]
    pub is_followed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub identity: Identity,
    pub follow_status: FollowStatus,
}

impl SearchResult {
    #[must_use]
    pub fn new(identity: Identity, is_following: bool) -> Self {
        Self {
            identity,
            follow_status: FollowStatus {
                is_following,
                is_followed: false,
            },
        }
    }

    #[must_use]
    pub fn address(&self) -> &Address {
        &self.identity.address
    }

    #[must_use]
    pub const fn is_following(&self) -> bool {
        self.follow_status.is_following
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One paginated list. `items` is unique by address; order is server order
/// followed by local appends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(rename = "list")]
    pub items: Vec<Identity>,
    pub page_info: PageInfo,
}

impl Page {
    #[must_use]
    pub fn new(items: Vec<Identity>, cursor: Option<String>, has_more: bool) -> Self {
        Self {
            items,
            page_info: PageInfo {
                end_cursor: cursor,
                has_next_page: has_more,
            },
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.page_info.end_cursor.as_deref()
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page_info.has_next_page
    }

    /// A next page can only be requested with both a cursor and `hasNextPage`.
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        self.has_more() && self.cursor().is_some()
    }

    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.position(address).is_some()
    }

    #[must_use]
    pub fn position(&self, address: &Address) -> Option<usize> {
        self.items.iter().position(|i| &i.address == address)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.items.iter().map(|i| &i.address)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowKind {
    Followers,
    Followings,
}

impl fmt::Display for FollowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Followers => "followers",
            Self::Followings => "followings",
        })
    }
}

/// The signed-in user's aggregate view of their own edges.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowGraphView {
    pub follower_count: i64,
    pub following_count: i64,
    pub followers: Page,
    pub followings: Page,
}

/// Response shape of the follow-list query; identical to the view it seeds.
pub type FollowListInfo = FollowGraphView;

impl FollowGraphView {
    #[must_use]
    pub const fn page(&self, kind: FollowKind) -> &Page {
        match kind {
            FollowKind::Followers => &self.followers,
            FollowKind::Followings => &self.followings,
        }
    }

    pub fn page_mut(&mut self, kind: FollowKind) -> &mut Page {
        match kind {
            FollowKind::Followers => &mut self.followers,
            FollowKind::Followings => &mut self.followings,
        }
    }

    /// Followers plus followings: the "credit score" shown after connecting.
    #[must_use]
    pub const fn credit_score(&self) -> i64 {
        self.follower_count + self.following_count
    }

    #[must_use]
    pub fn is_following(&self, address: &Address) -> bool {
        self.followings.contains(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x8ddD03b89116ba89E28Ef703fe037fF77451e38E";

    #[test]
    fn test_address_normalizes_case_and_whitespace() {
        let addr = Address::parse(format!("  {ADDR} ")).unwrap();
        assert_eq!(addr.as_str(), "0x8ddd03b89116ba89e28ef703fe037ff77451e38e");
        assert_eq!(addr, Address::parse(ADDR.to_lowercase()).unwrap());
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert_eq!(Address::parse("   "), Err(AddressError::Empty));
        assert!(matches!(
            Address::parse("8ddd03b89116ba89e28ef703fe037ff77451e38e"),
            Err(AddressError::MissingPrefix(_))
        ));
        assert_eq!(Address::parse("0x1234"), Err(AddressError::InvalidLength(4)));
        assert!(matches!(
            Address::parse("0xzzzd03b89116ba89e28ef703fe037ff77451e38e"),
            Err(AddressError::InvalidHex(_))
        ));
        assert!(!Address::is_valid("vitalik.eth"));
    }

    #[test]
    fn test_address_short_form() {
        let addr = Address::parse(ADDR).unwrap();
        assert_eq!(addr.short(), "0x8ddd...e38e");
    }

    #[test]
    fn test_identity_equality_ignores_profile() {
        let addr = Address::parse(ADDR).unwrap();
        let a = Identity::new(addr.clone()).with_profile_field("ens", "alice.eth");
        let b = Identity::new(addr).with_profile_field("avatar", "ipfs://x");
        assert_eq!(a, b);
        assert_eq!(a.display_name(), "alice.eth");
        assert_eq!(b.display_name(), "0x8ddd...e38e");
    }

    #[test]
    fn test_identity_wire_format_flattens_profile() {
        let json = format!(r#"{{"address":"{ADDR}","ens":"alice.eth","avatar":""}}"#);
        let identity: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(identity.address.as_str(), ADDR.to_lowercase());
        assert_eq!(identity.ens(), Some("alice.eth"));

        let back = serde_json::to_value(&identity).unwrap();
        assert_eq!(back["ens"], "alice.eth");
    }

    #[test]
    fn test_identity_rejects_invalid_address_on_the_wire() {
        let result = serde_json::from_str::<Identity>(r#"{"address":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_page_wire_format() {
        let json = format!(
            r#"{{"list":[{{"address":"{ADDR}"}}],"pageInfo":{{"endCursor":"c1","hasNextPage":true}}}}"#
        );
        let page: Page = serde_json::from_str(&json).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.cursor(), Some("c1"));
        assert!(page.can_load_more());
    }

    #[test]
    fn test_page_needs_cursor_and_flag() {
        assert!(!Page::new(vec![], None, true).can_load_more());
        assert!(!Page::new(vec![], Some("c".into()), false).can_load_more());
        assert!(Page::new(vec![], Some("c".into()), true).can_load_more());
    }

    #[test]
    fn test_credit_score_sums_counts() {
        let view = FollowGraphView {
            follower_count: 7,
            following_count: 3,
            ..FollowGraphView::default()
        };
        assert_eq!(view.credit_score(), 10);
    }
}
