use rusticata_macros::newtype_enum;

/// Data link type
///
/// The link-layer header type specifies the type of headers at the beginning
/// of the packet. The numeric values are assigned in the tcpdump registry;
/// values not listed here are preserved verbatim, never rejected.
///
/// See [http://www.tcpdump.org/linktypes.html](http://www.tcpdump.org/linktypes.html)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Linktype(pub i32);

newtype_enum! {
impl display Linktype {
    NULL = 0,
    ETHERNET = 1,
    AX25 = 3,
    IEEE802_5 = 6,
    ARCNET_BSD = 7,
    SLIP = 8,
    PPP = 9,
    FDDI = 10,
    PPP_HDLC = 50,
    PPP_ETHER = 51,
    ATM_RFC1483 = 100,
    RAW = 101,
    C_HDLC = 104,
    IEEE802_11 = 105,
    FRELAY = 107,
    LOOP = 108,
    LINUX_SLL = 113,
    LTALK = 114,
    PFLOG = 117,
    IEEE802_11_PRISM = 119,
    IP_OVER_FC = 122,
    SUNATM = 123,
    IEEE802_11_RADIOTAP = 127,
    ARCNET_LINUX = 129,
    APPLE_IP_OVER_IEEE1394 = 138,
    MTP2_WITH_PHDR = 139,
    MTP2 = 140,
    MTP3 = 141,
    SCCP = 142,
    DOCSIS = 143,
    LINUX_IRDA = 144,
    IEEE802_11_AVS = 163,
    BACNET_MS_TP = 165,
    PPP_PPPD = 166,
    GPRS_LLC = 169,
    LINUX_LAPD = 177,
    BLUETOOTH_HCI_H4 = 187,
    USB_LINUX = 189,
    PPI = 192,
    IEEE802_15_4_WITHFCS = 195,
    SITA = 196,
    ERF = 197,
    BLUETOOTH_HCI_H4_WITH_PHDR = 201,
    AX25_KISS = 202,
    LAPD = 203,
    PPP_WITH_DIR = 204,
    IPMB_LINUX = 209,
    IEEE802_15_4_NONASK_PHY = 215,
    USB_LINUX_MMAPPED = 220,
    FC_2 = 224,
    FC_2_WITH_FRAME_DELIMS = 225,
    IPNET = 226,
    CAN_SOCKETCAN = 227,
    IPV4 = 228,
    IPV6 = 229,
    IEEE802_15_4_NOFCS = 230,
    DBUS = 231,
    DVB_CI = 235,
    MUX27010 = 236,
    STANAG_5066_D_PDU = 237,
    NFLOG = 239,
    NETANALYZER = 240,
    NETANALYZER_TRANSPARENT = 241,
    IPOIB = 242,
    MPEG_2_TS = 243,
    NG40 = 244,
    NFC_LLCP = 245,
    INFINIBAND = 247,
    SCTP = 248,
    USBPCAP = 249,
    RTAC_SERIAL = 250,
    BLUETOOTH_LE_LL = 251,
    NETLINK = 253,
    BLUETOOTH_LINUX_MONITOR = 254,
    BLUETOOTH_BREDR_BB = 255,
    BLUETOOTH_LE_LL_WITH_PHDR = 256,
    PROFIBUS_DL = 257,
    PKTAP = 258,
    EPON = 259,
    IPMI_HPM_2 = 260,
    ZWAVE_R1_R2 = 261,
    ZWAVE_R3 = 262,
    WATTSTOPPER_DLM = 263,
    ISO_14443 = 264,
    RDS = 265,
    USB_DARWIN = 266,
    SDLC = 268,
    LORATAP = 270,
    VSOCK = 271,
    NORDIC_BLE = 272,
    DOCSIS31_XRA31 = 273,
    ETHERNET_MPACKET = 274,
    DISPLAYPORT_AUX = 275,
    LINUX_SLL2 = 276,
    OPENVIZSLA = 278,
    EBHSCR = 279,
    VPP_DISPATCH = 280,
    DSA_TAG_BRCM = 281,
    DSA_TAG_BRCM_PREPEND = 282,
    IEEE802_15_4_TAP = 283,
    DSA_TAG_DSA = 284,
    DSA_TAG_EDSA = 285,
    ELEE = 286,
    Z_WAVE_SERIAL = 287,
    USB_2_0 = 288,
    ATSC_ALP = 289,
}
}

impl Linktype {
    /// Return the registry short name of this link type, or `"?"` if the
    /// numeric value is not a known assignment.
    pub fn name(self) -> &'static str {
        match self {
            Linktype::NULL => "NULL",
            Linktype::ETHERNET => "ETHERNET",
            Linktype::AX25 => "AX25",
            Linktype::IEEE802_5 => "IEEE802_5",
            Linktype::ARCNET_BSD => "ARCNET_BSD",
            Linktype::SLIP => "SLIP",
            Linktype::PPP => "PPP",
            Linktype::FDDI => "FDDI",
            Linktype::PPP_HDLC => "PPP_HDLC",
            Linktype::PPP_ETHER => "PPP_ETHER",
            Linktype::ATM_RFC1483 => "ATM_RFC1483",
            Linktype::RAW => "RAW",
            Linktype::C_HDLC => "C_HDLC",
            Linktype::IEEE802_11 => "IEEE802_11",
            Linktype::FRELAY => "FRELAY",
            Linktype::LOOP => "LOOP",
            Linktype::LINUX_SLL => "LINUX_SLL",
            Linktype::LTALK => "LTALK",
            Linktype::PFLOG => "PFLOG",
            Linktype::IEEE802_11_PRISM => "IEEE802_11_PRISM",
            Linktype::IP_OVER_FC => "IP_OVER_FC",
            Linktype::SUNATM => "SUNATM",
            Linktype::IEEE802_11_RADIOTAP => "IEEE802_11_RADIOTAP",
            Linktype::ARCNET_LINUX => "ARCNET_LINUX",
            Linktype::APPLE_IP_OVER_IEEE1394 => "APPLE_IP_OVER_IEEE1394",
            Linktype::MTP2_WITH_PHDR => "MTP2_WITH_PHDR",
            Linktype::MTP2 => "MTP2",
            Linktype::MTP3 => "MTP3",
            Linktype::SCCP => "SCCP",
            Linktype::DOCSIS => "DOCSIS",
            Linktype::LINUX_IRDA => "LINUX_IRDA",
            Linktype::IEEE802_11_AVS => "IEEE802_11_AVS",
            Linktype::BACNET_MS_TP => "BACNET_MS_TP",
            Linktype::PPP_PPPD => "PPP_PPPD",
            Linktype::GPRS_LLC => "GPRS_LLC",
            Linktype::LINUX_LAPD => "LINUX_LAPD",
            Linktype::BLUETOOTH_HCI_H4 => "BLUETOOTH_HCI_H4",
            Linktype::USB_LINUX => "USB_LINUX",
            Linktype::PPI => "PPI",
            Linktype::IEEE802_15_4_WITHFCS => "IEEE802_15_4_WITHFCS",
            Linktype::SITA => "SITA",
            Linktype::ERF => "ERF",
            Linktype::BLUETOOTH_HCI_H4_WITH_PHDR => "BLUETOOTH_HCI_H4_WITH_PHDR",
            Linktype::AX25_KISS => "AX25_KISS",
            Linktype::LAPD => "LAPD",
            Linktype::PPP_WITH_DIR => "PPP_WITH_DIR",
            Linktype::IPMB_LINUX => "IPMB_LINUX",
            Linktype::IEEE802_15_4_NONASK_PHY => "IEEE802_15_4_NONASK_PHY",
            Linktype::USB_LINUX_MMAPPED => "USB_LINUX_MMAPPED",
            Linktype::FC_2 => "FC_2",
            Linktype::FC_2_WITH_FRAME_DELIMS => "FC_2_WITH_FRAME_DELIMS",
            Linktype::IPNET => "IPNET",
            Linktype::CAN_SOCKETCAN => "CAN_SOCKETCAN",
            Linktype::IPV4 => "IPV4",
            Linktype::IPV6 => "IPV6",
            Linktype::IEEE802_15_4_NOFCS => "IEEE802_15_4_NOFCS",
            Linktype::DBUS => "DBUS",
            Linktype::DVB_CI => "DVB_CI",
            Linktype::MUX27010 => "MUX27010",
            Linktype::STANAG_5066_D_PDU => "STANAG_5066_D_PDU",
            Linktype::NFLOG => "NFLOG",
            Linktype::NETANALYZER => "NETANALYZER",
            Linktype::NETANALYZER_TRANSPARENT => "NETANALYZER_TRANSPARENT",
            Linktype::IPOIB => "IPOIB",
            Linktype::MPEG_2_TS => "MPEG_2_TS",
            Linktype::NG40 => "NG40",
            Linktype::NFC_LLCP => "NFC_LLCP",
            Linktype::INFINIBAND => "INFINIBAND",
            Linktype::SCTP => "SCTP",
            Linktype::USBPCAP => "USBPCAP",
            Linktype::RTAC_SERIAL => "RTAC_SERIAL",
            Linktype::BLUETOOTH_LE_LL => "BLUETOOTH_LE_LL",
            Linktype::NETLINK => "NETLINK",
            Linktype::BLUETOOTH_LINUX_MONITOR => "BLUETOOTH_LINUX_MONITOR",
            Linktype::BLUETOOTH_BREDR_BB => "BLUETOOTH_BREDR_BB",
            Linktype::BLUETOOTH_LE_LL_WITH_PHDR => "BLUETOOTH_LE_LL_WITH_PHDR",
            Linktype::PROFIBUS_DL => "PROFIBUS_DL",
            Linktype::PKTAP => "PKTAP",
            Linktype::EPON => "EPON",
            Linktype::IPMI_HPM_2 => "IPMI_HPM_2",
            Linktype::ZWAVE_R1_R2 => "ZWAVE_R1_R2",
            Linktype::ZWAVE_R3 => "ZWAVE_R3",
            Linktype::WATTSTOPPER_DLM => "WATTSTOPPER_DLM",
            Linktype::ISO_14443 => "ISO_14443",
            Linktype::RDS => "RDS",
            Linktype::USB_DARWIN => "USB_DARWIN",
            Linktype::SDLC => "SDLC",
            Linktype::LORATAP => "LORATAP",
            Linktype::VSOCK => "VSOCK",
            Linktype::NORDIC_BLE => "NORDIC_BLE",
            Linktype::DOCSIS31_XRA31 => "DOCSIS31_XRA31",
            Linktype::ETHERNET_MPACKET => "ETHERNET_MPACKET",
            Linktype::DISPLAYPORT_AUX => "DISPLAYPORT_AUX",
            Linktype::LINUX_SLL2 => "LINUX_SLL2",
            Linktype::OPENVIZSLA => "OPENVIZSLA",
            Linktype::EBHSCR => "EBHSCR",
            Linktype::VPP_DISPATCH => "VPP_DISPATCH",
            Linktype::DSA_TAG_BRCM => "DSA_TAG_BRCM",
            Linktype::DSA_TAG_BRCM_PREPEND => "DSA_TAG_BRCM_PREPEND",
            Linktype::IEEE802_15_4_TAP => "IEEE802_15_4_TAP",
            Linktype::DSA_TAG_DSA => "DSA_TAG_DSA",
            Linktype::DSA_TAG_EDSA => "DSA_TAG_EDSA",
            Linktype::ELEE => "ELEE",
            Linktype::Z_WAVE_SERIAL => "Z_WAVE_SERIAL",
            Linktype::USB_2_0 => "USB_2_0",
            Linktype::ATSC_ALP => "ATSC_ALP",
            _ => "?",
        }
    }
}
