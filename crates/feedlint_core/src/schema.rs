//! Static descriptor of every known GTFS table: column names, semantic
//! types, presence levels, keys and per-field constraints. The loader and
//! the row parser are driven entirely by this data.

use crate::feed::{
    AGENCY_FILE, AREAS_FILE, ATTRIBUTIONS_FILE, BOOKING_RULES_FILE, CALENDAR_DATES_FILE,
    CALENDAR_FILE, FARE_ATTRIBUTES_FILE, FARE_LEG_JOIN_RULES_FILE, FARE_LEG_RULES_FILE,
    FARE_MEDIA_FILE, FARE_PRODUCTS_FILE, FARE_RULES_FILE, FARE_TRANSFER_RULES_FILE,
    FEED_INFO_FILE, FREQUENCIES_FILE, LEVELS_FILE, LOCATION_GROUPS_FILE,
    LOCATION_GROUP_STOPS_FILE, NETWORKS_FILE, PATHWAYS_FILE, RIDER_CATEGORIES_FILE,
    ROUTES_FILE, ROUTE_NETWORKS_FILE, SHAPES_FILE, STOPS_FILE, STOP_AREAS_FILE,
    STOP_TIMES_FILE, TIMEFRAMES_FILE, TRANSFERS_FILE, TRANSLATIONS_FILE, TRIPS_FILE,
};

/// Sentinel returned by the enum accessor for values outside the codec.
pub const UNRECOGNIZED_ENUM_VALUE: i16 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Id,
    Url,
    Email,
    PhoneNumber,
    LanguageCode,
    Timezone,
    CurrencyCode,
    Float,
    Integer,
    Decimal,
    Latitude,
    Longitude,
    Color,
    Time,
    Date,
    Enum(EnumKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLevel {
    Required,
    Recommended,
    Optional,
    ConditionallyRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLevel {
    Required,
    Recommended,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberBounds {
    Positive,
    NonNegative,
    NonZero,
}

impl NumberBounds {
    /// Human-readable bound description embedded in out-of-range notices.
    pub fn describe(self, type_name: &str) -> String {
        match self {
            NumberBounds::Positive => format!("positive {type_name}"),
            NumberBounds::NonNegative => format!("non-negative {type_name}"),
            NumberBounds::NonZero => format!("non-zero {type_name}"),
        }
    }
}

/// Integer codecs of the GTFS enum fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    LocationType,
    WheelchairBoarding,
    RouteType,
    ContinuousPickupDropOff,
    PickupDropOffType,
    BookingType,
    DirectionId,
    WheelchairAccessible,
    BikesAllowed,
    ServiceAvailability,
    ExceptionType,
    PaymentMethod,
    Transfers,
    ExactTimes,
    TransferType,
    PathwayMode,
    Bidirectional,
    YesNo,
    Timepoint,
    FareMediaType,
    DurationLimitType,
    FareTransferType,
    RiderFareCategory,
}

impl EnumKind {
    pub fn allows(self, value: i64) -> bool {
        match self {
            EnumKind::LocationType => matches!(value, 0..=4),
            EnumKind::WheelchairBoarding => matches!(value, 0 | 1 | 2),
            EnumKind::RouteType => matches!(value, 0..=7 | 11 | 12 | 100..=1702),
            EnumKind::ContinuousPickupDropOff => matches!(value, 0..=3),
            EnumKind::PickupDropOffType => matches!(value, 0..=3),
            EnumKind::BookingType => matches!(value, 0 | 1 | 2),
            EnumKind::DirectionId => matches!(value, 0 | 1),
            EnumKind::WheelchairAccessible => matches!(value, 0 | 1 | 2),
            EnumKind::BikesAllowed => matches!(value, 0 | 1 | 2),
            EnumKind::ServiceAvailability => matches!(value, 0 | 1),
            EnumKind::ExceptionType => matches!(value, 1 | 2),
            EnumKind::PaymentMethod => matches!(value, 0 | 1),
            EnumKind::Transfers => matches!(value, 0 | 1 | 2),
            EnumKind::ExactTimes => matches!(value, 0 | 1),
            EnumKind::TransferType => matches!(value, 0..=5),
            EnumKind::PathwayMode => matches!(value, 1..=7),
            EnumKind::Bidirectional => matches!(value, 0 | 1),
            EnumKind::YesNo => matches!(value, 0 | 1),
            EnumKind::Timepoint => matches!(value, 0 | 1),
            EnumKind::FareMediaType => matches!(value, 0..=4),
            EnumKind::DurationLimitType => matches!(value, 0..=3),
            EnumKind::FareTransferType => matches!(value, 0 | 1 | 2),
            EnumKind::RiderFareCategory => matches!(value, 0 | 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: &'static str,
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub level: FieldLevel,
    pub primary_key: bool,
    pub indexed: bool,
    pub mixed_case: bool,
    pub bounds: Option<NumberBounds>,
    pub foreign_key: Option<ForeignKeyRef>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, field_type: FieldType, level: FieldLevel) -> Self {
        Self {
            name,
            field_type,
            level,
            primary_key: false,
            indexed: false,
            mixed_case: false,
            bounds: None,
            foreign_key: None,
        }
    }

    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub const fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub const fn mixed_case(mut self) -> Self {
        self.mixed_case = true;
        self
    }

    pub const fn bounds(mut self, bounds: NumberBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub const fn foreign_key(mut self, table: &'static str, field: &'static str) -> Self {
        self.foreign_key = Some(ForeignKeyRef { table, field });
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub file_name: &'static str,
    pub level: FileLevel,
    pub fields: &'static [FieldSpec],
}

impl TableSpec {
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    pub fn column_name(&self, index: usize) -> Option<&'static str> {
        self.fields.get(index).map(|field| field.name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name.eq_ignore_ascii_case(name))
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    pub fn level(&self, name: &str) -> Option<FieldLevel> {
        self.field(name).map(|field| field.level)
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.field(name).map(|field| field.field_type)
    }

    pub fn bounds(&self, name: &str) -> Option<NumberBounds> {
        self.field(name).and_then(|field| field.bounds)
    }

    pub fn enum_codec(&self, name: &str) -> Option<EnumKind> {
        match self.field_type(name) {
            Some(FieldType::Enum(kind)) => Some(kind),
            _ => None,
        }
    }

    /// Ordered primary-key columns; empty when the table has no key.
    pub fn primary_key(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.fields.iter().filter(|field| field.primary_key)
    }

    pub fn has_primary_key(&self) -> bool {
        self.fields.iter().any(|field| field.primary_key)
    }

    pub fn foreign_keys(
        &self,
    ) -> impl Iterator<Item = (&'static FieldSpec, ForeignKeyRef)> + '_ {
        self.fields
            .iter()
            .filter_map(|field| field.foreign_key.map(|fk| (field, fk)))
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.fields.iter().filter(|field| field.indexed)
    }
}

pub fn schema_for_file(file_name: &str) -> Option<&'static TableSpec> {
    GTFS_TABLES
        .iter()
        .find(|table| table.file_name.eq_ignore_ascii_case(file_name))
}

/// Table used as the shape of files the descriptor does not know.
pub static UNKNOWN_TABLE: TableSpec = TableSpec {
    file_name: "",
    level: FileLevel::Optional,
    fields: &[],
};

use self::EnumKind as E;
use self::FieldLevel::{ConditionallyRequired, Optional, Recommended, Required};
use self::FieldType as T;
use self::NumberBounds::{NonNegative, NonZero, Positive};

const AGENCY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("agency_id", T::Id, ConditionallyRequired).primary_key(),
    FieldSpec::new("agency_name", T::Text, Required).mixed_case(),
    FieldSpec::new("agency_url", T::Url, Required),
    FieldSpec::new("agency_timezone", T::Timezone, Required),
    FieldSpec::new("agency_lang", T::LanguageCode, Optional),
    FieldSpec::new("agency_phone", T::PhoneNumber, Optional),
    FieldSpec::new("agency_fare_url", T::Url, Optional),
    FieldSpec::new("agency_email", T::Email, Optional),
];

const STOPS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("stop_id", T::Id, Required).primary_key(),
    FieldSpec::new("stop_code", T::Text, Optional),
    FieldSpec::new("stop_name", T::Text, ConditionallyRequired).mixed_case(),
    FieldSpec::new("tts_stop_name", T::Text, Optional),
    FieldSpec::new("stop_desc", T::Text, Optional),
    FieldSpec::new("stop_lat", T::Latitude, ConditionallyRequired),
    FieldSpec::new("stop_lon", T::Longitude, ConditionallyRequired),
    FieldSpec::new("zone_id", T::Id, ConditionallyRequired).indexed(),
    FieldSpec::new("stop_url", T::Url, Optional),
    FieldSpec::new("location_type", T::Enum(E::LocationType), Optional),
    FieldSpec::new("parent_station", T::Id, ConditionallyRequired)
        .foreign_key(STOPS_FILE, "stop_id")
        .indexed(),
    FieldSpec::new("stop_timezone", T::Timezone, Optional),
    FieldSpec::new("wheelchair_boarding", T::Enum(E::WheelchairBoarding), Optional),
    FieldSpec::new("level_id", T::Id, Optional).foreign_key(LEVELS_FILE, "level_id"),
    FieldSpec::new("platform_code", T::Text, Optional),
];

const ROUTES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("route_id", T::Id, Required).primary_key(),
    FieldSpec::new("agency_id", T::Id, ConditionallyRequired)
        .foreign_key(AGENCY_FILE, "agency_id"),
    FieldSpec::new("route_short_name", T::Text, ConditionallyRequired).mixed_case(),
    FieldSpec::new("route_long_name", T::Text, ConditionallyRequired).mixed_case(),
    FieldSpec::new("route_desc", T::Text, Optional).mixed_case(),
    FieldSpec::new("route_type", T::Enum(E::RouteType), Required),
    FieldSpec::new("route_url", T::Url, Optional),
    FieldSpec::new("route_color", T::Color, Optional),
    FieldSpec::new("route_text_color", T::Color, Optional),
    FieldSpec::new("route_sort_order", T::Integer, Optional).bounds(NonNegative),
    FieldSpec::new("continuous_pickup", T::Enum(E::ContinuousPickupDropOff), Optional),
    FieldSpec::new("continuous_drop_off", T::Enum(E::ContinuousPickupDropOff), Optional),
    FieldSpec::new("network_id", T::Id, ConditionallyRequired),
];

const TRIPS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("route_id", T::Id, Required).foreign_key(ROUTES_FILE, "route_id"),
    FieldSpec::new("service_id", T::Id, Required),
    FieldSpec::new("trip_id", T::Id, Required).primary_key(),
    FieldSpec::new("trip_headsign", T::Text, Optional).mixed_case(),
    FieldSpec::new("trip_short_name", T::Text, Optional).mixed_case(),
    FieldSpec::new("direction_id", T::Enum(E::DirectionId), Optional),
    FieldSpec::new("block_id", T::Id, Optional).indexed(),
    FieldSpec::new("shape_id", T::Id, ConditionallyRequired)
        .foreign_key(SHAPES_FILE, "shape_id")
        .indexed(),
    FieldSpec::new("wheelchair_accessible", T::Enum(E::WheelchairAccessible), Optional),
    FieldSpec::new("bikes_allowed", T::Enum(E::BikesAllowed), Optional),
];

const STOP_TIMES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("trip_id", T::Id, Required)
        .primary_key()
        .foreign_key(TRIPS_FILE, "trip_id")
        .indexed(),
    FieldSpec::new("arrival_time", T::Time, ConditionallyRequired),
    FieldSpec::new("departure_time", T::Time, ConditionallyRequired),
    FieldSpec::new("stop_id", T::Id, ConditionallyRequired)
        .foreign_key(STOPS_FILE, "stop_id")
        .indexed(),
    FieldSpec::new("location_group_id", T::Id, ConditionallyRequired)
        .foreign_key(LOCATION_GROUPS_FILE, "location_group_id"),
    FieldSpec::new("location_id", T::Id, ConditionallyRequired),
    FieldSpec::new("stop_sequence", T::Integer, Required)
        .primary_key()
        .bounds(NonNegative),
    FieldSpec::new("stop_headsign", T::Text, Optional).mixed_case(),
    FieldSpec::new("start_pickup_drop_off_window", T::Time, ConditionallyRequired),
    FieldSpec::new("end_pickup_drop_off_window", T::Time, ConditionallyRequired),
    FieldSpec::new("pickup_type", T::Enum(E::PickupDropOffType), Optional),
    FieldSpec::new("drop_off_type", T::Enum(E::PickupDropOffType), Optional),
    FieldSpec::new("continuous_pickup", T::Enum(E::ContinuousPickupDropOff), Optional),
    FieldSpec::new("continuous_drop_off", T::Enum(E::ContinuousPickupDropOff), Optional),
    FieldSpec::new("shape_dist_traveled", T::Float, Optional).bounds(NonNegative),
    FieldSpec::new("timepoint", T::Enum(E::Timepoint), Optional),
    FieldSpec::new("pickup_booking_rule_id", T::Id, Optional)
        .foreign_key(BOOKING_RULES_FILE, "booking_rule_id"),
    FieldSpec::new("drop_off_booking_rule_id", T::Id, Optional)
        .foreign_key(BOOKING_RULES_FILE, "booking_rule_id"),
];

const CALENDAR_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("service_id", T::Id, Required).primary_key(),
    FieldSpec::new("monday", T::Enum(E::ServiceAvailability), Required),
    FieldSpec::new("tuesday", T::Enum(E::ServiceAvailability), Required),
    FieldSpec::new("wednesday", T::Enum(E::ServiceAvailability), Required),
    FieldSpec::new("thursday", T::Enum(E::ServiceAvailability), Required),
    FieldSpec::new("friday", T::Enum(E::ServiceAvailability), Required),
    FieldSpec::new("saturday", T::Enum(E::ServiceAvailability), Required),
    FieldSpec::new("sunday", T::Enum(E::ServiceAvailability), Required),
    FieldSpec::new("start_date", T::Date, Required),
    FieldSpec::new("end_date", T::Date, Required),
];

const CALENDAR_DATES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("service_id", T::Id, Required).primary_key(),
    FieldSpec::new("date", T::Date, Required).primary_key(),
    FieldSpec::new("exception_type", T::Enum(E::ExceptionType), Required),
];

const FARE_ATTRIBUTES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("fare_id", T::Id, Required).primary_key(),
    FieldSpec::new("price", T::Float, Required).bounds(NonNegative),
    FieldSpec::new("currency_type", T::CurrencyCode, Required),
    FieldSpec::new("payment_method", T::Enum(E::PaymentMethod), Required),
    FieldSpec::new("transfers", T::Enum(E::Transfers), ConditionallyRequired),
    FieldSpec::new("agency_id", T::Id, ConditionallyRequired)
        .foreign_key(AGENCY_FILE, "agency_id"),
    FieldSpec::new("transfer_duration", T::Integer, Optional).bounds(NonNegative),
];

const FARE_RULES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("fare_id", T::Id, Required).foreign_key(FARE_ATTRIBUTES_FILE, "fare_id"),
    FieldSpec::new("route_id", T::Id, Optional).foreign_key(ROUTES_FILE, "route_id"),
    FieldSpec::new("origin_id", T::Id, Optional),
    FieldSpec::new("destination_id", T::Id, Optional),
    FieldSpec::new("contains_id", T::Id, Optional),
];

const FARE_MEDIA_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("fare_media_id", T::Id, Required).primary_key(),
    FieldSpec::new("fare_media_name", T::Text, Optional).mixed_case(),
    FieldSpec::new("fare_media_type", T::Enum(E::FareMediaType), Required),
];

const FARE_PRODUCTS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("fare_product_id", T::Id, Required).primary_key(),
    FieldSpec::new("fare_product_name", T::Text, Optional).mixed_case(),
    FieldSpec::new("fare_media_id", T::Id, Optional)
        .primary_key()
        .foreign_key(FARE_MEDIA_FILE, "fare_media_id"),
    FieldSpec::new("amount", T::Decimal, Required),
    FieldSpec::new("currency", T::CurrencyCode, Required),
];

const FARE_LEG_RULES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("leg_group_id", T::Id, Optional),
    FieldSpec::new("network_id", T::Id, Optional).foreign_key(NETWORKS_FILE, "network_id"),
    FieldSpec::new("from_area_id", T::Id, Optional).foreign_key(AREAS_FILE, "area_id"),
    FieldSpec::new("to_area_id", T::Id, Optional).foreign_key(AREAS_FILE, "area_id"),
    FieldSpec::new("from_timeframe_group_id", T::Id, Optional)
        .foreign_key(TIMEFRAMES_FILE, "timeframe_group_id"),
    FieldSpec::new("to_timeframe_group_id", T::Id, Optional)
        .foreign_key(TIMEFRAMES_FILE, "timeframe_group_id"),
    FieldSpec::new("fare_product_id", T::Id, Required)
        .foreign_key(FARE_PRODUCTS_FILE, "fare_product_id"),
    FieldSpec::new("rule_priority", T::Integer, Optional).bounds(NonNegative),
];

const FARE_TRANSFER_RULES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("from_leg_group_id", T::Id, Optional),
    FieldSpec::new("to_leg_group_id", T::Id, Optional),
    FieldSpec::new("transfer_count", T::Integer, ConditionallyRequired).bounds(NonZero),
    FieldSpec::new("duration_limit", T::Integer, Optional).bounds(Positive),
    FieldSpec::new(
        "duration_limit_type",
        T::Enum(E::DurationLimitType),
        ConditionallyRequired,
    ),
    FieldSpec::new("fare_transfer_type", T::Enum(E::FareTransferType), Required),
    FieldSpec::new("fare_product_id", T::Id, Optional)
        .foreign_key(FARE_PRODUCTS_FILE, "fare_product_id"),
];

const FARE_LEG_JOIN_RULES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("from_network_id", T::Id, Required).foreign_key(NETWORKS_FILE, "network_id"),
    FieldSpec::new("to_network_id", T::Id, Required).foreign_key(NETWORKS_FILE, "network_id"),
    FieldSpec::new("from_stop_id", T::Id, ConditionallyRequired)
        .foreign_key(STOPS_FILE, "stop_id"),
    FieldSpec::new("to_stop_id", T::Id, ConditionallyRequired)
        .foreign_key(STOPS_FILE, "stop_id"),
];

const AREAS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("area_id", T::Id, Required).primary_key(),
    FieldSpec::new("area_name", T::Text, Optional).mixed_case(),
];

const STOP_AREAS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("area_id", T::Id, Required)
        .primary_key()
        .foreign_key(AREAS_FILE, "area_id"),
    FieldSpec::new("stop_id", T::Id, Required)
        .primary_key()
        .foreign_key(STOPS_FILE, "stop_id"),
];

const TIMEFRAMES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("timeframe_group_id", T::Id, Required).primary_key(),
    FieldSpec::new("start_time", T::Time, ConditionallyRequired),
    FieldSpec::new("end_time", T::Time, ConditionallyRequired),
    FieldSpec::new("service_id", T::Id, Required),
];

const RIDER_CATEGORIES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("rider_category_id", T::Id, Required).primary_key(),
    FieldSpec::new("rider_category_name", T::Text, Required).mixed_case(),
    FieldSpec::new(
        "is_default_fare_category",
        T::Enum(E::RiderFareCategory),
        Required,
    ),
    FieldSpec::new("eligibility_url", T::Url, Optional),
];

const SHAPES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("shape_id", T::Id, Required).primary_key().indexed(),
    FieldSpec::new("shape_pt_lat", T::Latitude, Required),
    FieldSpec::new("shape_pt_lon", T::Longitude, Required),
    FieldSpec::new("shape_pt_sequence", T::Integer, Required)
        .primary_key()
        .bounds(NonNegative),
    FieldSpec::new("shape_dist_traveled", T::Float, Optional).bounds(NonNegative),
];

const FREQUENCIES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("trip_id", T::Id, Required)
        .primary_key()
        .foreign_key(TRIPS_FILE, "trip_id"),
    FieldSpec::new("start_time", T::Time, Required).primary_key(),
    FieldSpec::new("end_time", T::Time, Required),
    FieldSpec::new("headway_secs", T::Integer, Required).bounds(Positive),
    FieldSpec::new("exact_times", T::Enum(E::ExactTimes), Optional),
];

const TRANSFERS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("from_stop_id", T::Id, ConditionallyRequired)
        .foreign_key(STOPS_FILE, "stop_id"),
    FieldSpec::new("to_stop_id", T::Id, ConditionallyRequired)
        .foreign_key(STOPS_FILE, "stop_id"),
    FieldSpec::new("from_route_id", T::Id, Optional).foreign_key(ROUTES_FILE, "route_id"),
    FieldSpec::new("to_route_id", T::Id, Optional).foreign_key(ROUTES_FILE, "route_id"),
    FieldSpec::new("from_trip_id", T::Id, ConditionallyRequired)
        .foreign_key(TRIPS_FILE, "trip_id"),
    FieldSpec::new("to_trip_id", T::Id, ConditionallyRequired)
        .foreign_key(TRIPS_FILE, "trip_id"),
    FieldSpec::new("transfer_type", T::Enum(E::TransferType), Required),
    FieldSpec::new("min_transfer_time", T::Integer, Optional).bounds(NonNegative),
];

const PATHWAYS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("pathway_id", T::Id, Required).primary_key(),
    FieldSpec::new("from_stop_id", T::Id, Required).foreign_key(STOPS_FILE, "stop_id"),
    FieldSpec::new("to_stop_id", T::Id, Required).foreign_key(STOPS_FILE, "stop_id"),
    FieldSpec::new("pathway_mode", T::Enum(E::PathwayMode), Required),
    FieldSpec::new("is_bidirectional", T::Enum(E::Bidirectional), Required),
    FieldSpec::new("length", T::Float, Optional).bounds(NonNegative),
    FieldSpec::new("traversal_time", T::Integer, Optional).bounds(Positive),
    FieldSpec::new("stair_count", T::Integer, Optional).bounds(NonZero),
    FieldSpec::new("max_slope", T::Float, Optional),
    FieldSpec::new("min_width", T::Float, Optional).bounds(Positive),
    FieldSpec::new("signposted_as", T::Text, Optional).mixed_case(),
    FieldSpec::new("reversed_signposted_as", T::Text, Optional).mixed_case(),
];

const LEVELS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("level_id", T::Id, Required).primary_key(),
    FieldSpec::new("level_index", T::Float, Required),
    FieldSpec::new("level_name", T::Text, Optional).mixed_case(),
];

const LOCATION_GROUPS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("location_group_id", T::Id, Required).primary_key(),
    FieldSpec::new("location_group_name", T::Text, Optional).mixed_case(),
];

const LOCATION_GROUP_STOPS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("location_group_id", T::Id, Required)
        .foreign_key(LOCATION_GROUPS_FILE, "location_group_id"),
    FieldSpec::new("stop_id", T::Id, Required).foreign_key(STOPS_FILE, "stop_id"),
];

const BOOKING_RULES_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("booking_rule_id", T::Id, Required).primary_key(),
    FieldSpec::new("booking_type", T::Enum(E::BookingType), Required),
    FieldSpec::new("prior_notice_duration_min", T::Integer, ConditionallyRequired)
        .bounds(NonNegative),
    FieldSpec::new("prior_notice_duration_max", T::Integer, Optional).bounds(NonNegative),
    FieldSpec::new("prior_notice_last_day", T::Integer, ConditionallyRequired)
        .bounds(NonNegative),
    FieldSpec::new("prior_notice_last_time", T::Time, ConditionallyRequired),
    FieldSpec::new("prior_notice_start_day", T::Integer, Optional).bounds(NonNegative),
    FieldSpec::new("prior_notice_start_time", T::Time, ConditionallyRequired),
    FieldSpec::new("prior_notice_service_id", T::Id, Optional),
    FieldSpec::new("message", T::Text, Optional).mixed_case(),
    FieldSpec::new("pickup_message", T::Text, Optional).mixed_case(),
    FieldSpec::new("drop_off_message", T::Text, Optional).mixed_case(),
    FieldSpec::new("phone_number", T::PhoneNumber, Optional),
    FieldSpec::new("info_url", T::Url, Optional),
    FieldSpec::new("booking_url", T::Url, Optional),
];

const NETWORKS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("network_id", T::Id, Required).primary_key(),
    FieldSpec::new("network_name", T::Text, Optional).mixed_case(),
];

const ROUTE_NETWORKS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("network_id", T::Id, Required).foreign_key(NETWORKS_FILE, "network_id"),
    FieldSpec::new("route_id", T::Id, Required)
        .primary_key()
        .foreign_key(ROUTES_FILE, "route_id"),
];

const TRANSLATIONS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("table_name", T::Text, Required).primary_key(),
    FieldSpec::new("field_name", T::Text, Required).primary_key(),
    FieldSpec::new("language", T::LanguageCode, Required).primary_key(),
    FieldSpec::new("translation", T::Text, Required),
    FieldSpec::new("record_id", T::Id, ConditionallyRequired).primary_key(),
    FieldSpec::new("record_sub_id", T::Id, ConditionallyRequired).primary_key(),
    FieldSpec::new("field_value", T::Text, ConditionallyRequired).primary_key(),
];

const FEED_INFO_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("feed_publisher_name", T::Text, Required),
    FieldSpec::new("feed_publisher_url", T::Url, Required),
    FieldSpec::new("feed_lang", T::LanguageCode, Required),
    FieldSpec::new("default_lang", T::LanguageCode, Optional),
    FieldSpec::new("feed_start_date", T::Date, Recommended),
    FieldSpec::new("feed_end_date", T::Date, Recommended),
    FieldSpec::new("feed_version", T::Text, Recommended),
    FieldSpec::new("feed_contact_email", T::Email, Optional),
    FieldSpec::new("feed_contact_url", T::Url, Optional),
];

const ATTRIBUTIONS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("attribution_id", T::Id, Optional).primary_key(),
    FieldSpec::new("agency_id", T::Id, Optional).foreign_key(AGENCY_FILE, "agency_id"),
    FieldSpec::new("route_id", T::Id, Optional).foreign_key(ROUTES_FILE, "route_id"),
    FieldSpec::new("trip_id", T::Id, Optional).foreign_key(TRIPS_FILE, "trip_id"),
    FieldSpec::new("organization_name", T::Text, Required),
    FieldSpec::new("is_producer", T::Enum(E::YesNo), Optional),
    FieldSpec::new("is_operator", T::Enum(E::YesNo), Optional),
    FieldSpec::new("is_authority", T::Enum(E::YesNo), Optional),
    FieldSpec::new("attribution_url", T::Url, Optional),
    FieldSpec::new("attribution_email", T::Email, Optional),
    FieldSpec::new("attribution_phone", T::PhoneNumber, Optional),
];

pub static GTFS_TABLES: &[TableSpec] = &[
    TableSpec {
        file_name: AGENCY_FILE,
        level: FileLevel::Required,
        fields: AGENCY_FIELDS,
    },
    TableSpec {
        file_name: STOPS_FILE,
        level: FileLevel::Required,
        fields: STOPS_FIELDS,
    },
    TableSpec {
        file_name: ROUTES_FILE,
        level: FileLevel::Required,
        fields: ROUTES_FIELDS,
    },
    TableSpec {
        file_name: TRIPS_FILE,
        level: FileLevel::Required,
        fields: TRIPS_FIELDS,
    },
    TableSpec {
        file_name: STOP_TIMES_FILE,
        level: FileLevel::Required,
        fields: STOP_TIMES_FIELDS,
    },
    TableSpec {
        file_name: CALENDAR_FILE,
        level: FileLevel::Optional,
        fields: CALENDAR_FIELDS,
    },
    TableSpec {
        file_name: CALENDAR_DATES_FILE,
        level: FileLevel::Optional,
        fields: CALENDAR_DATES_FIELDS,
    },
    TableSpec {
        file_name: FARE_ATTRIBUTES_FILE,
        level: FileLevel::Optional,
        fields: FARE_ATTRIBUTES_FIELDS,
    },
    TableSpec {
        file_name: FARE_RULES_FILE,
        level: FileLevel::Optional,
        fields: FARE_RULES_FIELDS,
    },
    TableSpec {
        file_name: FARE_MEDIA_FILE,
        level: FileLevel::Optional,
        fields: FARE_MEDIA_FIELDS,
    },
    TableSpec {
        file_name: FARE_PRODUCTS_FILE,
        level: FileLevel::Optional,
        fields: FARE_PRODUCTS_FIELDS,
    },
    TableSpec {
        file_name: FARE_LEG_RULES_FILE,
        level: FileLevel::Optional,
        fields: FARE_LEG_RULES_FIELDS,
    },
    TableSpec {
        file_name: FARE_TRANSFER_RULES_FILE,
        level: FileLevel::Optional,
        fields: FARE_TRANSFER_RULES_FIELDS,
    },
    TableSpec {
        file_name: FARE_LEG_JOIN_RULES_FILE,
        level: FileLevel::Optional,
        fields: FARE_LEG_JOIN_RULES_FIELDS,
    },
    TableSpec {
        file_name: AREAS_FILE,
        level: FileLevel::Optional,
        fields: AREAS_FIELDS,
    },
    TableSpec {
        file_name: STOP_AREAS_FILE,
        level: FileLevel::Optional,
        fields: STOP_AREAS_FIELDS,
    },
    TableSpec {
        file_name: TIMEFRAMES_FILE,
        level: FileLevel::Optional,
        fields: TIMEFRAMES_FIELDS,
    },
    TableSpec {
        file_name: RIDER_CATEGORIES_FILE,
        level: FileLevel::Optional,
        fields: RIDER_CATEGORIES_FIELDS,
    },
    TableSpec {
        file_name: SHAPES_FILE,
        level: FileLevel::Optional,
        fields: SHAPES_FIELDS,
    },
    TableSpec {
        file_name: FREQUENCIES_FILE,
        level: FileLevel::Optional,
        fields: FREQUENCIES_FIELDS,
    },
    TableSpec {
        file_name: TRANSFERS_FILE,
        level: FileLevel::Optional,
        fields: TRANSFERS_FIELDS,
    },
    TableSpec {
        file_name: PATHWAYS_FILE,
        level: FileLevel::Optional,
        fields: PATHWAYS_FIELDS,
    },
    TableSpec {
        file_name: LEVELS_FILE,
        level: FileLevel::Optional,
        fields: LEVELS_FIELDS,
    },
    TableSpec {
        file_name: LOCATION_GROUPS_FILE,
        level: FileLevel::Optional,
        fields: LOCATION_GROUPS_FIELDS,
    },
    TableSpec {
        file_name: LOCATION_GROUP_STOPS_FILE,
        level: FileLevel::Optional,
        fields: LOCATION_GROUP_STOPS_FIELDS,
    },
    TableSpec {
        file_name: BOOKING_RULES_FILE,
        level: FileLevel::Optional,
        fields: BOOKING_RULES_FIELDS,
    },
    TableSpec {
        file_name: NETWORKS_FILE,
        level: FileLevel::Optional,
        fields: NETWORKS_FIELDS,
    },
    TableSpec {
        file_name: ROUTE_NETWORKS_FILE,
        level: FileLevel::Optional,
        fields: ROUTE_NETWORKS_FIELDS,
    },
    TableSpec {
        file_name: TRANSLATIONS_FILE,
        level: FileLevel::Optional,
        fields: TRANSLATIONS_FIELDS,
    },
    TableSpec {
        file_name: FEED_INFO_FILE,
        level: FileLevel::Recommended,
        fields: FEED_INFO_FIELDS,
    },
    TableSpec {
        file_name: ATTRIBUTIONS_FILE,
        level: FileLevel::Optional,
        fields: ATTRIBUTIONS_FIELDS,
    },
];
