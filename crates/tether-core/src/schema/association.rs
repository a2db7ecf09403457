use std::fmt;

/// Immutable declaration of a relationship between two models.
///
/// Descriptors are created once, when the owner model is registered, and
/// shared by every association slot that binds to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub kind: AssociationKind,

    /// Accessor name, unique per owner model
    pub name: String,

    /// Model declaring the association
    pub owner: String,

    /// Model on the other side of the association
    pub target: String,

    /// Table storing the target model
    pub target_table: String,

    /// Column holding the referencing id. For `BelongsTo` this lives in the
    /// owner's table, for `HasMany` in the target table.
    pub foreign_key: String,

    /// What happens to a child row removed from a `HasMany` collection by
    /// `replace` or `clear`.
    pub on_remove: RemovalPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    BelongsTo,
    HasMany,
}

/// Foreign key reconciliation for rows leaving a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RemovalPolicy {
    /// Clear the child's foreign key; the row survives.
    #[default]
    Nullify,

    /// Delete the child row.
    Destroy,
}

impl Association {
    pub fn is_belongs_to(&self) -> bool {
        self.kind == AssociationKind::BelongsTo
    }

    pub fn is_has_many(&self) -> bool {
        self.kind == AssociationKind::HasMany
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({} {})", self.owner, self.name, self.kind, self.target)
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BelongsTo => "belongs_to",
            Self::HasMany => "has_many",
        })
    }
}
