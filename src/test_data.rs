#[cfg(test)]
pub const POST_DATA: &str = "---
title: \"What I learned after 20+ years of software development\"
publishedAt: \"2022-04-02\"
summary: \"A list of what I try to do myself\"
image: \"/images/twenty-years.png\"
---

How to be a great software engineer?

Someone asked me this question today and I didn't have an answer. After thinking for a while, I came up with a list of what I try to do myself.

Disclaimer: I don't think I am a great engineer, but I would love to have listened to that myself when I started my career, over 20 years ago.

I will divide this in parts, non-technical and technical
";

#[cfg(test)]
pub const POST_DATA_MDX: &str = "---
title: \"Hello World\"
publishedAt: \"2023-05-01\"
summary: \"First post\"
---

# Hi
Content here.

{/* drafts below */}
";
