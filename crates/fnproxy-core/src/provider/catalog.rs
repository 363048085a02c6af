//! Built-in region listings for supported providers.
//!
//! Order matters: `prefix-N` patterns pick the first `N` entries as listed here.

pub const ALIBABA: &str = "alibaba";
pub const TENCENT: &str = "tencent";
pub const HUAWEI: &str = "huawei";
pub const AWS: &str = "aws";

pub const ALIBABA_REGIONS: &[&str] = &[
    "cn-hangzhou",
    "cn-shanghai",
    "cn-qingdao",
    "cn-beijing",
    "cn-zhangjiakou",
    "cn-huhehaote",
    "cn-shenzhen",
    "cn-chengdu",
    "cn-hongkong",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-5",
    "ap-northeast-1",
    "ap-south-1",
    "eu-central-1",
    "eu-west-1",
    "us-west-1",
    "us-east-1",
];

pub const TENCENT_REGIONS: &[&str] = &[
    "ap-beijing",
    "ap-chengdu",
    "ap-guangzhou",
    "ap-shanghai",
    "ap-nanjing",
    "ap-hongkong",
    "ap-mumbai",
    "ap-singapore",
    "ap-bangkok",
    "ap-jakarta",
    "ap-seoul",
    "ap-tokyo",
    "eu-frankfurt",
    "na-siliconvalley",
    "na-ashburn",
    "na-toronto",
    "sa-saopaulo",
];

pub const HUAWEI_REGIONS: &[&str] = &[
    "cn-north-4",
    "cn-north-1",
    "cn-east-2",
    "cn-east-3",
    "cn-south-1",
    "cn-southwest-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "af-south-1",
];

pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ca-central-1",
    "eu-central-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-north-1",
    "sa-east-1",
];

/// Provider ids with their listings, in the order they are registered.
pub fn builtin_providers() -> [(&'static str, &'static [&'static str]); 4] {
    [
        (ALIBABA, ALIBABA_REGIONS),
        (TENCENT, TENCENT_REGIONS),
        (HUAWEI, HUAWEI_REGIONS),
        (AWS, AWS_REGIONS),
    ]
}
