//! Archive version markers and well-known type hashes

use std::fmt;

use crate::error::FormatError;

/// Name hash of an archive entry (64-bit MurmurHash2 of its path)
pub type NameHash = u64;

/// Type hash of an archive entry (64-bit MurmurHash2 of its type name)
pub type TypeHash = u64;

/// The two recognized archive version markers
///
/// The marker is the first little-endian `u32` of every archive file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ArchiveVersion {
    /// Chunk-compressed exploded container ("Format A")
    Packed = 0xF000_0004,
    /// Single-buffer direct container ("Format B")
    Direct = 0xF000_0011,
}

impl ArchiveVersion {
    /// Parse a version marker
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0xF000_0004 => Some(Self::Packed),
            0xF000_0011 => Some(Self::Direct),
            _ => None,
        }
    }

    /// Raw marker value
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Peek the version marker at the start of an archive buffer
    pub fn detect(data: &[u8]) -> Result<Self, FormatError> {
        let marker: [u8; 4] = data
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                FormatError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "archive shorter than its version marker",
                ))
            })?;
        let value = u32::from_le_bytes(marker);
        Self::from_u32(value).ok_or(FormatError::UnknownVersion(value))
    }
}

impl TryFrom<u32> for ArchiveVersion {
    type Error = FormatError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(FormatError::UnknownVersion(value))
    }
}

impl fmt::Display for ArchiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Packed => "packed",
            Self::Direct => "direct",
        };
        write!(f, "{name} ({:#010X})", self.as_u32())
    }
}

macro_rules! known_types {
    ($($variant:ident => $name:literal = $hash:literal,)+) => {
        /// Entry types with a recovered type name
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum KnownType {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )+
        }

        impl KnownType {
            /// Every known type, in table order
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Type hash of this type
            pub const fn hash(self) -> TypeHash {
                match self {
                    $(Self::$variant => $hash,)+
                }
            }

            /// Type name, also used as the file extension on unpack
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Look up a type by its hash
            pub fn from_hash(hash: TypeHash) -> Option<Self> {
                match hash {
                    $($hash => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

known_types! {
    AhBin => "ah_bin" = 0x2A0A70ACFE476E1D,
    Animation => "animation" = 0x931E336D7646CC26,
    Bik => "bik" = 0xAA5965F03029FA18,
    Bones => "bones" = 0x18DEAD01056B72E9,
    CameraShake => "camera_shake" = 0xFCAAF813B4D3CC1E,
    Cloth => "cloth" = 0xD7014A50477953E0,
    Config => "config" = 0x82645835E6B73232,
    Entity => "entity" = 0x9831CA893B0D087D,
    Font => "font" = 0x9EFE0A916AAE7880,
    Geleta => "geleta" = 0xB8FD4D2CEDE20ED7,
    GeometryGroup => "geometry_group" = 0xC4F0F4BE7FB0C8D6,
    HashLookup => "hash_lookup" = 0xE3F2851035957AF5,
    HavokAiProperties => "havok_ai_properties" = 0x6592B918E67F082C,
    HavokPhysicsProperties => "havok_physics_properties" = 0xF7A09F8BB35A1D49,
    IkSkeleton => "ik_skeleton" = 0x57A13425279979D7,
    Level => "level" = 0x2A690FD348FE9AC5,
    Lua => "lua" = 0xA14E8DFA2CD117E2,
    Material => "material" = 0xEAC0B497876ADEDF,
    MouseCursor => "mouse_cursor" = 0xB277B11FE4A61D37,
    NetworkConfig => "network_config" = 0x3B1FA9E8F6BAC374,
    Package => "package" = 0xAD9C6D9ED1E5E77A,
    Particles => "particles" = 0xA8193123526FAD64,
    Physics => "physics" = 0x5F7203C8F280DAB8,
    Prefab => "prefab" = 0xAB2F78E885F513C6,
    RagdollProfile => "ragdoll_profile" = 0x1D59BD6687DB6B33,
    RenderConfig => "render_config" = 0x27862FE24795319C,
    Renderable => "renderable" = 0x7910103158FC1DE9,
    RuntimeFont => "runtime_font" = 0x05106B81DCD58A13,
    ShaderLibrary => "shader_library" = 0xE5EE32A477239A93,
    ShaderLibraryGroup => "shader_library_group" = 0x9E5C3CC74575AEB5,
    ShadingEnvironment => "shading_environment" = 0xFE73C7DCFF8A7CA5,
    ShadingEnvironmentMapping => "shading_environment_mapping" = 0x250E0A11AC8E26F8,
    Speedtree => "speedtree" = 0xE985C5F61C169997,
    StateMachine => "state_machine" = 0xA486D4045106165C,
    Strings => "strings" = 0x0D972BAB10B40FD3,
    Texture => "texture" = 0xCD4238C6A0C69E32,
    TextureAtlas => "texture_atlas" = 0x9199BB50B6896F02,
    Unit => "unit" = 0xE0A48D0BE9A7453F,
    VectorField => "vector_field" = 0xF7505933166D6755,
    WwiseBank => "wwise_bank" = 0x535A7BD3E650D799,
    WwiseDep => "wwise_dep" = 0xAF32095C82F2B070,
    WwiseMetadata => "wwise_metadata" = 0xD50A8B7E1C82B110,
    WwiseProperties => "wwise_properties" = 0x5FDD5FE391076F9F,
    WwiseStream => "wwise_stream" = 0x504B55235D21440E,
}

/// Type hash of script entries
pub const TYPE_LUA: TypeHash = KnownType::Lua.hash();
