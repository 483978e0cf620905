//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table. The `name` matches the table's `name`
//! column; `label` is the Portuguese text shown in the dashboards.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => ($str:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant in discriminant order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Look up a variant by its lookup-table name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $str => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// The lookup-table name (e.g. `"pending_data"`).
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $str, )+
                }
            }

            /// Human-readable dashboard label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Memorial page lifecycle.
    MemorialStatus {
        Active = 1 => ("active", "Ativo"),
        PendingData = 2 => ("pending_data", "Pendente"),
        Inactive = 3 => ("inactive", "Inativo"),
    }
}

define_status_enum! {
    /// Contact-form lead follow-up status.
    LeadStatus {
        Pending = 1 => ("pending", "Pendente"),
        Contacted = 2 => ("contacted", "Contatado"),
        Converted = 3 => ("converted", "Convertido"),
        Rejected = 4 => ("rejected", "Rejeitado"),
    }
}

define_status_enum! {
    /// Production queue status of a memorial order (physical QR plaque).
    ProductionStatus {
        New = 1 => ("new", "Novo"),
        InProduction = 2 => ("in_production", "Em Produção"),
        WaitingData = 3 => ("waiting_data", "Aguardando Dados"),
        Ready = 4 => ("ready", "Pronto"),
        Delivered = 5 => ("delivered", "Entregue"),
        Cancelled = 6 => ("cancelled", "Cancelado"),
    }
}

define_status_enum! {
    /// Production queue priority.
    OrderPriority {
        Low = 1 => ("low", "Baixa"),
        Normal = 2 => ("normal", "Normal"),
        High = 3 => ("high", "Alta"),
        Urgent = 4 => ("urgent", "Urgente"),
    }
}

impl ProductionStatus {
    /// Delivered and cancelled orders are closed.
    pub fn is_terminal(self) -> bool {
        matches!(self, ProductionStatus::Delivered | ProductionStatus::Cancelled)
    }

    /// Whether staff may move an order from `self` to `next`.
    ///
    /// Open orders may move to any other status; closed orders never move.
    pub fn can_transition_to(self, next: ProductionStatus) -> bool {
        !self.is_terminal() && self != next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for status in ProductionStatus::ALL {
            assert_eq!(ProductionStatus::from_id(status.id()), Some(*status));
        }
        assert_eq!(MemorialStatus::from_id(0), None);
        assert_eq!(MemorialStatus::from_id(4), None);
    }

    #[test]
    fn names_match_lookup_tables() {
        assert_eq!(MemorialStatus::PendingData.name(), "pending_data");
        assert_eq!(
            ProductionStatus::from_name("in_production"),
            Some(ProductionStatus::InProduction)
        );
        assert_eq!(LeadStatus::from_name("unknown"), None);
    }

    #[test]
    fn labels_are_portuguese() {
        assert_eq!(ProductionStatus::WaitingData.label(), "Aguardando Dados");
        assert_eq!(OrderPriority::Urgent.label(), "Urgente");
        assert_eq!(LeadStatus::Converted.label(), "Convertido");
    }

    #[test]
    fn open_orders_move_freely() {
        use ProductionStatus::*;
        assert!(New.can_transition_to(InProduction));
        assert!(InProduction.can_transition_to(WaitingData));
        assert!(WaitingData.can_transition_to(InProduction));
        assert!(Ready.can_transition_to(Delivered));
        assert!(New.can_transition_to(Cancelled));
    }

    #[test]
    fn closed_orders_never_move() {
        use ProductionStatus::*;
        for next in ProductionStatus::ALL {
            assert!(!Delivered.can_transition_to(*next));
            assert!(!Cancelled.can_transition_to(*next));
        }
    }

    #[test]
    fn self_transition_is_rejected() {
        assert!(!ProductionStatus::Ready.can_transition_to(ProductionStatus::Ready));
    }
}
