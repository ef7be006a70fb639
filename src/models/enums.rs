//! Shared domain enums (wire names match the coordination backend)

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LifecycleStage
// ---------------------------------------------------------------------------

/// Project lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStage {
    Estimation,
    Awarded,
    Ongoing,
    Completed,
    Lost,
}

impl LifecycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Estimation => "ESTIMATION",
            LifecycleStage::Awarded => "AWARDED",
            LifecycleStage::Ongoing => "ONGOING",
            LifecycleStage::Completed => "COMPLETED",
            LifecycleStage::Lost => "LOST",
        }
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LifecycleStage::Estimation => "Estimation",
            LifecycleStage::Awarded => "Awarded",
            LifecycleStage::Ongoing => "Ongoing",
            LifecycleStage::Completed => "Completed",
            LifecycleStage::Lost => "Lost",
        };
        write!(f, "{}", label)
    }
}

/// Commercial product line of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    Primed,
    Colorplus,
}

// ---------------------------------------------------------------------------
// Notes and files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteType {
    General,
    Update,
    Schedule,
    Delay,
    Material,
    Issue,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::General => "GENERAL",
            NoteType::Update => "UPDATE",
            NoteType::Schedule => "SCHEDULE",
            NoteType::Delay => "DELAY",
            NoteType::Material => "MATERIAL",
            NoteType::Issue => "ISSUE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileCategory {
    FullMaterialList,
    DrawingsLink,
    Submittals,
    ScopeOfWorkContract,
    JobSheets,
    ChangeOrders,
    Sco,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::FullMaterialList => "FULL_MATERIAL_LIST",
            FileCategory::DrawingsLink => "DRAWINGS_LINK",
            FileCategory::Submittals => "SUBMITTALS",
            FileCategory::ScopeOfWorkContract => "SCOPE_OF_WORK_CONTRACT",
            FileCategory::JobSheets => "JOB_SHEETS",
            FileCategory::ChangeOrders => "CHANGE_ORDERS",
            FileCategory::Sco => "SCO",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileCategory::FullMaterialList => "Full material list",
            FileCategory::DrawingsLink => "Drawings",
            FileCategory::Submittals => "Submittals",
            FileCategory::ScopeOfWorkContract => "Scope of work / contract",
            FileCategory::JobSheets => "Job sheets",
            FileCategory::ChangeOrders => "Change orders",
            FileCategory::Sco => "SCO",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType {
    Truck,
    Manlift,
    Forklift,
    Van,
    Excavator,
    Roller,
    Dozer,
    Loader,
    Crane,
    Drill,
    Generator,
    Compressor,
    Welder,
    Pump,
    Other,
}

/// Status stored on the equipment record itself (not the derived state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    #[default]
    Available,
    Assigned,
    Maintenance,
    OutOfService,
}

/// State derived from assignments, services and movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentState {
    Available,
    Assigned,
    Maintenance,
    ServiceScheduled,
    Movement,
}

impl EquipmentState {
    pub const ALL: [EquipmentState; 5] = [
        EquipmentState::Available,
        EquipmentState::Assigned,
        EquipmentState::ServiceScheduled,
        EquipmentState::Maintenance,
        EquipmentState::Movement,
    ];
}

impl std::fmt::Display for EquipmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EquipmentState::Available => "Available",
            EquipmentState::Assigned => "Assigned",
            EquipmentState::Maintenance => "Maintenance",
            EquipmentState::ServiceScheduled => "Service scheduled",
            EquipmentState::Movement => "Movement",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    #[default]
    Routine,
    Repair,
    Inspection,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ServiceType::Routine => "ROUTINE",
            ServiceType::Repair => "REPAIR",
            ServiceType::Inspection => "INSPECTION",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Scheduled,
    InProgress,
    Completed,
    Canceled,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Assignment,
    Movement,
}

/// Request lifecycle: `Pending` moves once to one of the terminal states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(self, RequestStatus::Pending) && next.is_terminal()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}
